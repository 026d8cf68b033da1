//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A credential variable is unset or empty.
    #[error("{var} is not set. Export it or add it to a .env file")]
    MissingCredential { var: &'static str },

    /// No assistant ID from flag, environment or config file.
    #[error(
        "no assistant configured. Pass --assistant, set AIYOU_ASSISTANT_ID, or add [assistant] id to the config file"
    )]
    MissingAssistant,

    /// A setting has an unusable value.
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
