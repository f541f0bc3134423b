//! Error types for media services

use thiserror::Error;

/// Media error type
#[derive(Error, Debug)]
pub enum MediaError {
    /// No skeleton data registered under this file name
    #[error("Skeleton data not found: {file}")]
    SkeletonNotFound { file: String },

    /// Skeleton exists but has no clip with this name
    #[error("Animation \"{clip}\" not found in {file}")]
    ClipNotFound { file: String, clip: String },

    /// Sound alias is not registered
    #[error("Sound not found: {0}")]
    SoundNotFound(String),

    /// Sound source could not be created
    #[error("Failed to load sound {alias} from {url}: {reason}")]
    SoundLoadFailed {
        alias: String,
        url: String,
        reason: String,
    },

    /// Asset manifest could not be parsed
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type alias
pub type MediaResult<T> = Result<T, MediaError>;
