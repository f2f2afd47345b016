//! Common error types for the fotodesk tools

use thiserror::Error;

/// Common result type for fotodesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error taxonomy across the fotodesk tools
///
/// `Validation` is the only variant that prevents a job from starting; the
/// per-item variants (`NotFound`, `Transport`, `MetadataWrite`) are logged and
/// the offending item skipped.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid job input, surfaced before any processing starts
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Lookup produced no candidates
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network failure, timeout, or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Target format unsupported or the codec rejected the payload
    #[error("Metadata write error: {0}")]
    MetadataWrite(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
