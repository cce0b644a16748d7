//! crates/cm_io/src/hasher.rs
//!
//! Deterministic SHA-256 digests.
//! - Use `sha256_canonical_value(..)` for parsed JSON (goes through canonical_json).
//! - Use `sha256_hex(..)` or `sha256_file(..)` for **raw bytes/files**.
//! - Hex digests are **lowercase**.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::IoError;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over a file's raw bytes.
pub fn sha256_file(path: &Path) -> Result<String, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    let mut r = BufReader::new(f);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = r.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(feature = "serde")]
/// SHA-256 over an already-parsed JSON value.
pub fn sha256_canonical_value(v: &serde_json::Value) -> Result<String, IoError> {
    let bytes = crate::canonical_json::to_canonical_json_bytes(v)?;
    Ok(sha256_hex(&bytes))
}
