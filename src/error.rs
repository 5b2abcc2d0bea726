//! Error types for kvrecord
//!
//! Provides a unified error type for all codec operations.

use thiserror::Error;

/// Result type alias using RecordError
pub type Result<T> = std::result::Result<T, RecordError>;

/// Unified error type for record encoding, decoding and streaming
#[derive(Debug, Error)]
pub enum RecordError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// The value cannot be represented in its declared type
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Structurally invalid buffer or unregistered type tag
    #[error("Decoding error: {0}")]
    Decoding(String),

    // -------------------------------------------------------------------------
    // Stream Errors
    // -------------------------------------------------------------------------
    /// The source ran out before a declared field could be fully read
    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Registry Errors
    // -------------------------------------------------------------------------
    #[error("Registry error: {0}")]
    Registry(String),
}

impl RecordError {
    /// True if the error is a short read rather than corrupt data
    pub fn is_truncated(&self) -> bool {
        matches!(self, RecordError::Truncated { .. })
    }
}
