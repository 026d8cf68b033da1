//! Configuration for the aiyou CLI.
//!
//! Provides:
//! - Layered TOML settings (user config dir + project-local `aiyou.toml`)
//! - `.env` parsing without mutating the process environment
//! - Credential and assistant ID resolution (environment → `.env` → settings)

pub mod env;
pub mod error;
pub mod settings;

pub use env::{
    ASSISTANT_VAR, Credentials, DOTENV_FILE, DotEnv, EMAIL_VAR, PASSWORD_VAR, resolve_assistant_id,
};
pub use error::{ConfigError, Result};
pub use settings::{
    ApiSettings, AssistantSettings, LoadedSettings, PollSettings, Settings, SettingsSource,
    TranscriptSettings, config_dir, load_settings, load_settings_file, user_config_path,
};
