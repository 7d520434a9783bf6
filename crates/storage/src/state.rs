// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed readers/writers for each persisted artifact (§3, §6).

use crate::atomic::{read_json, write_atomic, StorageError};
use chrono::{DateTime, Utc};
use pr_core::{Checkpoint, MetricsDocument, RunRecord, StageRecord};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorVersionError {
    #[error("I/O error reading processor metadata at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn write_run_record(path: &Path, record: &RunRecord) -> Result<(), StorageError> {
    write_atomic(path, record)
}

pub fn write_stage_record(path: &Path, record: &StageRecord) -> Result<(), StorageError> {
    write_atomic(path, record)
}

pub fn load_stage_record(path: &Path) -> Result<Option<StageRecord>, StorageError> {
    read_json(path)
}

pub fn write_metrics_document(path: &Path, doc: &MetricsDocument) -> Result<(), StorageError> {
    write_atomic(path, doc)
}

pub fn write_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Result<(), StorageError> {
    write_atomic(path, checkpoint)
}

/// Load the progress/checkpoint file; absent file means offset 0 (§4.5).
pub fn load_checkpoint(path: &Path) -> Result<Checkpoint, StorageError> {
    Ok(read_json(path)?.unwrap_or_default())
}

/// "Processor version" per the adopted open-question decision (DESIGN.md):
/// the processor file's last-modification time, serialized as a stable
/// RFC3339 string (§4.3). Used as one of the idempotency key's inputs.
pub fn read_processor_mtime(path: &Path) -> Result<String, ProcessorVersionError> {
    let metadata = std::fs::metadata(path).map_err(|source| ProcessorVersionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let modified = metadata
        .modified()
        .map_err(|source| ProcessorVersionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let datetime: DateTime<Utc> = modified.into();
    Ok(datetime.to_rfc3339())
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
