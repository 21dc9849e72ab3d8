//! Error type for the tools.

use thiserror::Error;
use township_core::error::DataLoadError;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Configuration, content or script could not be loaded.
    #[error(transparent)]
    Data(#[from] DataLoadError),

    /// The data directory does not exist.
    #[error("Data directory '{0}' does not exist")]
    MissingDirectory(String),

    /// Output could not be rendered as JSON.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
