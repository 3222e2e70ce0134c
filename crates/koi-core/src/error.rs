//! Core error types for koi-core.
//!
//! Persistence-read failures never surface here -- the store falls back to
//! defaults and logs. Everything else (write failures, invalid input)
//! propagates through this hierarchy.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for koi-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent-medium errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A write-through failed; in-memory state was left unchanged
    #[error("Failed to persist '{key}': {source}")]
    WriteFailed {
        key: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Batch delete failed part-way
    #[error("Failed to clear stored data: {0}")]
    ClearFailed(#[source] rusqlite::Error),

    /// A value could not be serialized for storage
    #[error("Failed to encode '{key}': {source}")]
    EncodeFailed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Data directory could not be determined or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Validation errors for user-supplied values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Color string is not a 6-hex-digit `#RRGGBB` code
    #[error("Invalid color '{value}': expected #RRGGBB")]
    InvalidColor { value: String },

    /// Break length is outside the allowed set
    #[error("Invalid break length {seconds}s: expected 30, 60 or 180")]
    InvalidBreakLength { seconds: u32 },

    /// Avatar id does not map to a known avatar
    #[error("Unknown avatar id {id}: catalog has {count} entries")]
    UnknownAvatar { id: u8, count: usize },

    /// Theme identifier does not resolve to a preset or "custom"
    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
