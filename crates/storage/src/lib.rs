// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pr-storage: atomic persistence and exclusive stage locking (§4.4, §4.8).
//!
//! Every state file is written tmp-then-rename; every stage lock is an
//! exclusive file create that fails atomically if the target exists. No
//! component outside this crate ever opens a state file for in-place
//! modification.

pub mod atomic;
pub mod completion_marker;
pub mod lock;
pub mod state;

pub use atomic::{write_atomic, StorageError};
pub use completion_marker::{marker_exists, write_marker};
pub use lock::{LockError, StageLock, DEFAULT_LOCK_TIMEOUT};
pub use state::{
    load_checkpoint, load_stage_record, read_processor_mtime, write_checkpoint,
    write_metrics_document, write_run_record, write_stage_record, ProcessorVersionError,
};
