//! Error types for mdkit library.

use std::io;
use thiserror::Error;

/// Result type alias for mdkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// User-visible message for JSON input that does not parse.
pub const INVALID_JSON_MESSAGE: &str = "invalid JSON input";

/// User-visible message for an unknown conversion selector.
pub const UNSUPPORTED_CONVERSION_MESSAGE: &str = "unsupported conversion type";

/// Main error type for mdkit library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON input could not be parsed into a document model.
    #[error("Invalid JSON input: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// The conversion selector is not recognized.
    #[error("Unsupported conversion type: {0}")]
    UnsupportedConversion(String),

    /// An external sub-renderer (e.g. diagrams) is not ready.
    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// The document model could not be encoded as JSON.
    #[error("JSON serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An export artifact could not be delivered.
    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Returns the inline message shown to the user in place of output.
    pub fn user_message(&self) -> String {
        match self {
            Error::MalformedJson(_) => INVALID_JSON_MESSAGE.to_string(),
            Error::UnsupportedConversion(_) => UNSUPPORTED_CONVERSION_MESSAGE.to_string(),
            other => format!("conversion failed: {}", other),
        }
    }
}
