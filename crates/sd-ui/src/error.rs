//! Error types for UI construction

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    /// STANDARD attributes must define the button size
    #[error("Button STANDARD state is missing {0}")]
    MissingSize(&'static str),

    #[error("Invalid button size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    /// Texture not known to the asset provider
    #[error("Texture not found: {0}")]
    TextureNotFound(String),
}

pub type UiResult<T> = Result<T, UiError>;
