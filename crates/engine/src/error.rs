// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the orchestration engine (§7).

use pr_storage::StorageError;
use thiserror::Error;

/// Errors raised while loading and validating a pipeline declaration (§4.1).
/// Non-retryable; aborts the run before any artifact is written.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to read pipeline declaration at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse pipeline declaration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pipeline has no stages")]
    NoStages,
    #[error("stage name {0:?} does not match ^[A-Za-z0-9_-]+$")]
    InvalidStageName(String),
    #[error("duplicate stage name: {0}")]
    DuplicateStageName(String),
    #[error("stage {stage}: processor not found at {processor}")]
    ProcessorNotFound {
        stage: String,
        processor: std::path::PathBuf,
    },
}

/// Raised only when the stage machinery fails to persist its own state
/// (§7's `IOFault` row). Every other row of that table — offline violation,
/// lock timeout, missing processor, transient/terminal execution — is an
/// *expected* stage outcome and surfaces as `Ok(StageMetric { status:
/// Failed, .. })`, never as this type.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A whole-run failure that aborts before or outside stage execution (§7).
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid pipeline spec: {0}")]
    Spec(#[from] SpecError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("stage machinery error: {0}")]
    Stage(#[from] StageError),
}
