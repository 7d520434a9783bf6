// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmp-then-rename persistence (§4.8).
//!
//! Writes to a sibling temp file, `sync_all`s it, then atomically renames
//! onto the final path, with a process-unique temp suffix so two
//! orchestrator processes racing to persist the same cross-run artifact
//! (e.g. a `StageRecord`) never race on the same in-flight temp file.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let pid = std::process::id();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!("{file_name}.{pid}.tmp"))
}

/// Serialize `value` as UTF-8 JSON and write it to `path` via tmp-then-rename.
///
/// The parent directory is created if missing. On success, no `.tmp` sibling
/// remains. On any failure, the target `path` is left untouched -- only the
/// (now-garbage) tmp file may exist, and a later call to this function for
/// the same `path` will just overwrite it with a fresh one.
pub fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp_path = tmp_path_for(path);
    {
        let file = File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer
            .flush()
            .map_err(|e| io_err(&tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| io_err(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| io_err(&tmp_path, e))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Write an empty sentinel file via tmp-then-rename (the completion marker,
/// §3; also reusable for any other empty-file marker).
pub fn write_empty_atomic(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp_path = tmp_path_for(path);
    {
        let file = File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
        file.sync_all().map_err(|e| io_err(&tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Load and deserialize a JSON file, returning `Ok(None)` if it does not exist.
pub fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|e| io_err(path, e))?;
    let value = serde_json::from_slice(&bytes)?;
    Ok(Some(value))
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
