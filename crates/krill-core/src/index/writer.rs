//! Atomic, merge-aware index writer.
//!
//! Writers serialize on an advisory lock held on `<index>.lock`, read the
//! current index, merge, write the result to a temp file in the same
//! directory and rename it over the target. Readers never see a partial file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::NamedTempFile;

use super::types::Index;
use crate::allocate::IndexEntry;
use crate::errors::SerializationError;

/// Merge `entries` under `root_key` into the index at `path` and return
/// the index as written.
pub fn write_index(
    path: &Path,
    root_key: &str,
    entries: &[IndexEntry],
) -> Result<Index, SerializationError> {
    let start = Instant::now();
    let unwritable = |source: std::io::Error| SerializationError::Unwritable {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(unwritable)?;

    let lock_path = lock_path_for(path);
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock_path)
        .map_err(unwritable)?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock.write().map_err(|source| SerializationError::Lock {
        path: lock_path.clone(),
        source,
    })?;

    let mut index = read_existing(path)?;
    let previous_roots = index.root_keys().count();
    index.merge(root_key, entries);
    let json = index.to_json_string()?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(unwritable)?;
    tmp.write_all(json.as_bytes()).map_err(unwritable)?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(unwritable)?;
    }
    tmp.as_file().sync_all().map_err(unwritable)?;
    tmp.persist(path).map_err(|e| unwritable(e.error))?;

    tracing::info!(
        path = %path.display(),
        root_key,
        entries = entries.len(),
        preserved_roots = previous_roots,
        bytes = json.len(),
        write_time_us = start.elapsed().as_micros() as u64,
        "index written"
    );
    Ok(index)
}

/// Sidecar lock file guarding read-merge-write cycles on `path`.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

/// Current index at `path`. Missing or blank files are an empty index.
fn read_existing(path: &Path) -> Result<Index, SerializationError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Index::new()),
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(SerializationError::CorruptIndex {
                path: path.to_path_buf(),
                message: "not UTF-8 text".to_string(),
            })
        }
        Err(source) => {
            return Err(SerializationError::Unwritable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if text.trim().is_empty() {
        return Ok(Index::new());
    }
    Index::from_json_str(&text).map_err(|e| SerializationError::CorruptIndex {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
