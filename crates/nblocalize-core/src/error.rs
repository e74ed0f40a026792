//! Error types for notebook localization

use std::path::PathBuf;
use thiserror::Error;

/// Error type for notebook localization operations
#[derive(Error, Debug)]
pub enum LocalizeError {
    /// Notebook file does not exist
    #[error("Notebook not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// I/O error when reading or writing the notebook file
    #[error("Failed to access notebook file: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON, or JSON that is not a notebook document
    #[error("Malformed notebook document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

/// Result type alias for localization operations
pub type Result<T> = std::result::Result<T, LocalizeError>;
