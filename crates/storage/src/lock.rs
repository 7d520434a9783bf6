// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive per-stage filesystem locking (§4.4).
//!
//! Uses an exclusive *create* of the lock file, which fails atomically if
//! the target already exists, held per stage execution and released by
//! unlinking. `StageLock` releases on every exit path via `Drop`, so a panic
//! unwind or an early `?` return can't leave the lock held.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LockError {
    #[error("timed out after {0:?} waiting for lock at {1}")]
    Timeout(Duration, PathBuf),
    #[error("I/O error acquiring lock at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Default lock acquisition timeout (§4.4, §5).
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

const INITIAL_POLL_INTERVAL: Duration = Duration::from_millis(20);
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A held exclusive lock on a stage. Unlinks the lock file on drop.
pub struct StageLock {
    path: PathBuf,
    released: bool,
}

impl StageLock {
    /// Try to create `path` exclusively, retrying with exponential-growth
    /// polling (capped by `MAX_POLL_INTERVAL`) until `timeout` elapses.
    pub async fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let deadline = Instant::now() + timeout;
        let mut poll_interval = INITIAL_POLL_INTERVAL;

        loop {
            match create_exclusive(path) {
                Ok(()) => {
                    debug!(path = %path.display(), "lock acquired");
                    return Ok(Self {
                        path: path.to_path_buf(),
                        released: false,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(LockError::Timeout(timeout, path.to_path_buf()));
                    }
                    tokio::time::sleep(poll_interval.min(time_remaining(deadline))).await;
                    poll_interval = (poll_interval * 2).min(MAX_POLL_INTERVAL);
                }
                Err(source) => {
                    return Err(LockError::Io {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
    }

    /// Release the lock now, instead of waiting for `Drop`. Idempotent: a
    /// second call (or a drop after this) is a no-op.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to release lock");
            }
        }
    }
}

impl Drop for StageLock {
    fn drop(&mut self) {
        self.release_inner();
    }
}

fn time_remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

fn create_exclusive(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    Ok(())
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
