//! Error types shared across Gazemap crates.

use std::path::PathBuf;

/// Top-level error type for Gazemap operations.
#[derive(Debug, thiserror::Error)]
pub enum GazemapError {
    /// Caller supplied something unusable: bad file, wrong extension,
    /// percentages that don't add up. Raised before any processing starts.
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Artifact error: {message}")]
    Artifact { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GazemapError.
pub type GazemapResult<T> = Result<T, GazemapError>;

impl GazemapError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the failure was caused by the caller's input rather than by
    /// the system. Client errors are reported before any work is done.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::FileNotFound { .. })
    }
}
