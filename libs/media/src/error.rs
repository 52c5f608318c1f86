//! Error types for the image pipeline

use thiserror::Error;

/// Errors produced while accepting and deriving uploaded images
#[derive(Error, Debug)]
pub enum MediaError {
    /// The upload had no content
    #[error("Uploaded file is empty")]
    Empty,

    /// The declared or detected type is not an accepted image type
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// The upload exceeds the configured size ceiling
    #[error("File is too large ({size} bytes, maximum is {max} bytes)")]
    TooLarge { size: usize, max: usize },

    /// Destination folder name is not a plain directory name
    #[error("Invalid upload folder: {0}")]
    InvalidFolder(String),

    /// Decoding, resizing or encoding failed
    #[error("Failed to process image: {0}")]
    Processing(String),

    /// Staging or output file could not be written
    #[error("Upload storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// True when the failure was caused by what the client sent
    pub fn is_client_error(&self) -> bool {
        !matches!(self, MediaError::Io(_))
    }
}

/// Type alias for Result with MediaError
pub type MediaResult<T> = Result<T, MediaError>;
