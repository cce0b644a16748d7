//! Canonical JSON utilities (cm_io)
//! - Objects: keys sorted lexicographically (UTF-8 codepoint order)
//! - Arrays: order preserved (caller is responsible for stable ordering)
//! - Output: compact (no extra spaces, no trailing newline)
//! - Atomic write: temp file in same dir + fsync(temp) + rename; fsync(dir) on Unix
//! - Fallback: if rename fails (e.g., cross-device), write directly to target,
//!   fsync(target), then remove temp, fsync(dir).

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::IoError;

#[cfg(feature = "serde")]
use serde_json::Value;

#[cfg(feature = "serde")]
/// Convert a serde_json `Value` to canonical JSON bytes (compact, no trailing newline).
pub fn to_canonical_json_bytes(v: &Value) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::with_capacity(1024);
    write_canonical_value(v, &mut out)?;
    Ok(out)
}

#[cfg(feature = "serde")]
/// Write canonical JSON to `path` atomically (with safe cross-device fallback).
pub fn write_canonical_file(path: &Path, v: &Value) -> Result<(), IoError> {
    let bytes = to_canonical_json_bytes(v)?;
    write_atomic(path, &bytes)
}

/// Write raw bytes to `path` atomically. Used for canonical JSON and rendered text alike.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .map_err(|e| IoError::Path(format!("{} ({e})", parent.display())))?;

    let tmp = make_unique_tmp_path(path);
    let written: io::Result<()> = (|| {
        let mut tf = OpenOptions::new()
            .write(true)
            .create_new(true) // avoid clobbering another writer's temp
            .open(&tmp)?;
        tf.write_all(bytes)?;
        tf.sync_all()
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(IoError::Path(format!("{} ({e})", tmp.display())));
    }

    match fs::rename(&tmp, path) {
        Ok(()) => {
            let _ = fsync_dir(&parent);
            Ok(())
        }
        Err(_e) => {
            // Fallback: write directly to the target (handles cross-device cases).
            let res: io::Result<()> = (|| {
                let mut f = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                f.write_all(bytes)?;
                f.sync_all()
            })();
            let _ = fs::remove_file(&tmp);
            res.map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
            let _ = fsync_dir(&parent);
            Ok(())
        }
    }
}

#[cfg(feature = "serde")]
fn write_canonical_value(v: &Value, out: &mut Vec<u8>) -> Result<(), IoError> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(b) => {
            if *b {
                out.extend_from_slice(b"true");
            } else {
                out.extend_from_slice(b"false");
            }
        }
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => serde_json::to_writer(&mut *out, s)?,
        Value::Array(arr) => {
            out.push(b'[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical_value(elem, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (i, (k, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, k)?;
                out.push(b':');
                write_canonical_value(val, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

/// Create a unique temp path next to `target`: "<filename>.<pid>.<counter>.tmp"
fn make_unique_tmp_path(target: &Path) -> PathBuf {
    use std::ffi::OsString;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);

    let fname = target
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("file");

    let tmp_name: OsString = OsString::from(format!("{fname}.{pid}.{n}.tmp"));

    match target.parent() {
        Some(dir) => dir.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

/// Fsync the directory containing the file (Unix only). No-op on other platforms.
#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    let df = OpenOptions::new().read(true).open(dir)?;
    df.sync_all()
}

#[cfg(not(unix))]
#[inline]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
