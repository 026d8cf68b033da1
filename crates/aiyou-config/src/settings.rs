//! TOML settings with layered discovery.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/aiyou/config.toml` (or `$AIYOU_CONFIG_DIR/config.toml`)
//! 2. `./aiyou.toml` (project-local)
//! 3. CLI arguments and environment (handled by the binary)
//!
//! ```toml
//! [api]
//! base_url = "https://ai.dragonflygroup.fr/api"
//! timeout_secs = 120
//!
//! [assistant]
//! id = "asst_123"
//!
//! [poll]
//! max_attempts = 30
//! delay_secs = 2
//!
//! [transcript]
//! dir = "~/aiyou-transcripts"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "aiyou.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for config directory resolution.
const APP_NAME: &str = "aiyou";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "AIYOU_CONFIG_DIR";

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All file-based settings. Every field is optional; the binary applies
/// defaults for anything left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub assistant: AssistantSettings,
    pub poll: PollSettings,
    pub transcript: TranscriptSettings,
}

/// `[api]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[assistant]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub id: Option<String>,
}

/// `[poll]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub max_attempts: Option<u32>,
    pub delay_secs: Option<u64>,
}

/// `[transcript]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Directory transcripts are saved into. Defaults to the working directory.
    pub dir: Option<PathBuf>,
}

impl Settings {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Settings) {
        if other.api.base_url.is_some() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.timeout_secs.is_some() {
            self.api.timeout_secs = other.api.timeout_secs;
        }
        if other.assistant.id.is_some() {
            self.assistant.id = other.assistant.id;
        }
        if other.poll.max_attempts.is_some() {
            self.poll.max_attempts = other.poll.max_attempts;
        }
        if other.poll.delay_secs.is_some() {
            self.poll.delay_secs = other.poll.delay_secs;
        }
        if other.transcript.dir.is_some() {
            self.transcript.dir = other.transcript.dir;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.poll.max_attempts == Some(0) {
            return Err(ConfigError::Invalid {
                field: "poll.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "api.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.assistant.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "assistant.id",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Discovery
// ─────────────────────────────────────────────────────────────────────────────

/// Tracks where each settings layer was loaded from.
#[derive(Debug, Clone)]
pub struct SettingsSource {
    pub path: PathBuf,
    pub loaded: bool,
}

/// Result of settings discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    /// The merged settings.
    pub settings: Settings,
    /// Sources that were checked, lowest precedence first.
    pub sources: Vec<SettingsSource>,
    /// Layers that existed but could not be loaded.
    pub warnings: Vec<String>,
}

impl LoadedSettings {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Discover and merge all settings layers.
///
/// `config_dir` overrides both `AIYOU_CONFIG_DIR` and the platform default;
/// `project_dir` defaults to the working directory. A layer that fails to
/// parse is skipped with a warning rather than aborting the load.
pub fn load_settings(project_dir: Option<&Path>, config_dir: Option<&Path>) -> LoadedSettings {
    let mut settings = Settings::default();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    let user_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => user_config_path(),
    };
    if let Some(path) = user_path {
        sources.push(load_layer(&mut settings, &path, &mut warnings));
    }

    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut settings, &project_path, &mut warnings));

    LoadedSettings {
        settings,
        sources,
        warnings,
    }
}

/// Load settings from a specific file path (no discovery).
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Settings::from_toml(&contents)
}

/// Path of the user config file.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// User config directory for aiyou.
///
/// Checks `AIYOU_CONFIG_DIR` first, then falls back to the platform default
/// (`~/.config/aiyou` on Linux, `~/Library/Application Support/aiyou` on macOS).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Try to load a settings file and merge it into the existing settings.
fn load_layer(settings: &mut Settings, path: &Path, warnings: &mut Vec<String>) -> SettingsSource {
    if !path.is_file() {
        return SettingsSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    match load_settings_file(path) {
        Ok(layer) => {
            tracing::debug!(path = %path.display(), "Loaded settings layer");
            settings.merge(layer);
            SettingsSource {
                path: path.to_path_buf(),
                loaded: true,
            }
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            SettingsSource {
                path: path.to_path_buf(),
                loaded: false,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
