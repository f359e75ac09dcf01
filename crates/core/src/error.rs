//! Error types for presentation import.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing a parsed presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input or output file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization of a document tree or deck failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The document parser rejected the input as malformed or unsupported.
    /// Aborts the import before anything is committed.
    #[error("Failed to parse presentation: {0}")]
    ParseFailure(String),

    /// A custom shape path could not be scanned.
    /// Recovered locally by the path resolver.
    #[error("Malformed shape path: {0}")]
    MalformedShapePath(String),

    /// The editor state refused the converted deck.
    #[error("Failed to commit slides: {0}")]
    CommitError(String),
}
