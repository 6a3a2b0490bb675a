// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KovaError>;

#[derive(Error, Debug)]
pub enum KovaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository {0} is already tracked")]
    AlreadyTracked(String),

    #[error("Invalid repository identifier '{0}' (expected owner/name)")]
    InvalidIdentifier(String),

    #[error("Remote resource not found: {0}")]
    NotFound(String),

    #[error("Remote request failed: {0}")]
    Remote(String),

    #[error("AI provider not configured: {0}")]
    AiNotConfigured(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl KovaError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KovaError::FileOperation {
            path: path.into(),
            source,
        }
    }
}
