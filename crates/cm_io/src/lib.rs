//! crates/cm_io/src/lib.rs
//! Minimal, single-source-of-truth I/O crate.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Dataset + params loading with size limits and validation (`loader`).
//! - Canonical JSON bytes and atomic writes (`canonical_json`).
//! - SHA-256 digests over raw and canonical bytes (`hasher`).

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for cm_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with a JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json {
        pointer: String,
        msg: String,
    },

    /// Hashing-related errors (e.g., feature disabled).
    #[error("hash error: {0}")]
    Hash(String),

    /// Dataset or params content violates a domain rule.
    #[error("invalid: {0}")]
    Invalid(String),

    /// Input exceeds the configured size limit.
    #[error("limit exceeded: {0}")]
    Limit(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json reports line/column, not a pointer; default to root.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

pub mod canonical_json;
#[cfg(feature = "hash")]
pub mod hasher;
#[cfg(feature = "serde")]
pub mod loader;
