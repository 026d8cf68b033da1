//! `.env` files and credential resolution.
//!
//! Values come from the process environment first, then from a `.env` file
//! (`KEY=VALUE` lines). The `.env` file never overrides the environment and is
//! never written back into it.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::{ConfigError, Result, Settings};

/// Environment variable holding the account email.
pub const EMAIL_VAR: &str = "AIYOU_EMAIL";

/// Environment variable holding the account password.
pub const PASSWORD_VAR: &str = "AIYOU_PASSWORD";

/// Environment variable holding the assistant ID.
pub const ASSISTANT_VAR: &str = "AIYOU_ASSISTANT_ID";

/// Default `.env` location, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

// ─────────────────────────────────────────────────────────────────────────────
// .env
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed contents of a `.env` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotEnv {
    vars: HashMap<String, String>,
}

impl DotEnv {
    /// Parse `KEY=VALUE` lines.
    ///
    /// Blank lines and `#` comments are skipped, an `export ` prefix is
    /// allowed, and one layer of matching single or double quotes is removed.
    /// Later duplicates win.
    pub fn parse(contents: &str) -> Self {
        let mut vars = HashMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            vars.insert(key.to_string(), unquote(value.trim()).to_string());
        }
        Self { vars }
    }

    /// Load a `.env` file. A missing file yields an empty set.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let dotenv = Self::parse(&contents);
                tracing::debug!(path = %path.display(), vars = dotenv.len(), "Loaded .env file");
                Ok(dotenv)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::ReadFile {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Environment first, then `.env`. Empty values count as unset.
fn lookup_with(key: &str, env: impl Fn(&str) -> Option<String>, dotenv: &DotEnv) -> Option<String> {
    env(key)
        .filter(|v| !v.is_empty())
        .or_else(|| dotenv.get(key).filter(|v| !v.is_empty()).map(str::to_string))
}

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// Account credentials used for login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Resolve `AIYOU_EMAIL` and `AIYOU_PASSWORD` from the environment and `.env`.
    pub fn resolve(dotenv: &DotEnv) -> Result<Self> {
        Self::resolve_with(|k| std::env::var(k).ok(), dotenv)
    }

    fn resolve_with(env: impl Fn(&str) -> Option<String>, dotenv: &DotEnv) -> Result<Self> {
        let email = lookup_with(EMAIL_VAR, &env, dotenv)
            .ok_or(ConfigError::MissingCredential { var: EMAIL_VAR })?;
        let password = lookup_with(PASSWORD_VAR, &env, dotenv)
            .ok_or(ConfigError::MissingCredential { var: PASSWORD_VAR })?;
        Ok(Self { email, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistant
// ─────────────────────────────────────────────────────────────────────────────

/// Pick the assistant ID: explicit flag, then `AIYOU_ASSISTANT_ID` (environment
/// or `.env`), then `[assistant] id` from the settings file.
pub fn resolve_assistant_id(flag: Option<&str>, dotenv: &DotEnv, settings: &Settings) -> Result<String> {
    resolve_assistant_id_with(flag, |k| std::env::var(k).ok(), dotenv, settings)
}

fn resolve_assistant_id_with(
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    dotenv: &DotEnv,
    settings: &Settings,
) -> Result<String> {
    flag.map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| lookup_with(ASSISTANT_VAR, env, dotenv))
        .or_else(|| settings.assistant.id.clone())
        .ok_or(ConfigError::MissingAssistant)
}
