// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injected filesystem locations (§9 design note: "avoid process-wide state").
//!
//! Every derived path used by the orchestrator is computed from a single
//! `PathLayout`, constructed once from the pipeline root. No component reads
//! a hardcoded path or a process global, which is what lets the whole engine
//! be exercised in-process against a `tempfile::TempDir`.

use std::path::{Path, PathBuf};

/// Filesystem locations derived from one pipeline root.
#[derive(Debug, Clone)]
pub struct PathLayout {
    root: PathBuf,
}

impl PathLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The pipeline root itself: also the Executor's working directory (§4.6).
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    pub fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    pub fn run_record(&self, run_id: &str) -> PathBuf {
        self.state_dir().join(format!("run_{run_id}.json"))
    }

    pub fn stage_record(&self, stage_name: &str) -> PathBuf {
        self.state_dir().join(format!("stage_{stage_name}.json"))
    }

    pub fn metrics_document(&self, run_id: &str) -> PathBuf {
        self.state_dir().join(format!("metrics_{run_id}.json"))
    }

    /// The checkpoint/progress file (§4.5): the orchestrator reads
    /// `lineOffset` from it before executing a checkpoint-enabled stage, and
    /// the processor is responsible for rewriting it atomically as it makes
    /// progress. One file, one writer at a time, never both.
    pub fn progress_file(&self, stage_name: &str) -> PathBuf {
        self.state_dir().join(format!("progress_{stage_name}.json"))
    }

    pub fn lock_file(&self, stage_name: &str) -> PathBuf {
        self.locks_dir().join(format!("{stage_name}.lock"))
    }

    /// Resolves a stage's output directory to an absolute path rooted at
    /// the pipeline root, for `PIPELINE_OUTPUT_DIR` (§4.6).
    pub fn absolute(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }

    /// Completion marker path for a stage (§3).
    pub fn completion_marker(&self, output_dir: &Path, stage_name: &str) -> PathBuf {
        self.absolute(output_dir).join(format!(".{stage_name}.done"))
    }
}

#[cfg(test)]
#[path = "path_layout_tests.rs"]
mod tests;
