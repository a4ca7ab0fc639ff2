//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while restoring a snapshot.
///
/// Any of these is fatal to the analysis: no partial tree is ever returned.
#[derive(Error, Debug)]
pub enum DeserializationError {
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Snapshot references disallowed type: {0}")]
    DisallowedType(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid snapshot structure: {0}")]
    InvalidStructure(String),

    #[error("No snapshot available to restore")]
    MissingSnapshot,
}

/// Errors raised by template loaders
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Unable to find template \"{0}\"")]
    NotFound(String),

    #[error("Invalid template name \"{name}\": {reason}")]
    InvalidName { name: String, reason: String },
}

/// Errors that can occur during raw trace parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),

    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while freezing a session into collector data
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Restore(#[from] DeserializationError),
}
