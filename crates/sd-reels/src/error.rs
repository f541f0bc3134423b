//! Error types for machine configuration

use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value the reels cannot run with
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown timing profile: {0}")]
    UnknownProfile(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type ConfigResult<T> = Result<T, ConfigError>;
