// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pr-engine: the orchestration core. Loads a pipeline declaration, runs its
//! stages one at a time against a [`pr_core::PathLayout`], and persists every
//! state transition through `pr-storage`'s atomic primitives.
//!
//! Data flow per stage: spec load → offline guard → idempotency evaluation →
//! (skip | lock → checkpoint load → retry(execute) → persist → unlock) →
//! run-level state update.

pub mod error;
pub mod executor;
pub mod idempotency;
pub mod offline_guard;
pub mod retry;
pub mod run;
pub mod spec_loader;
pub mod stage;

pub use error::{RunError, SpecError, StageError};
pub use executor::{execute, ExecutionOutcome, ExecutionRequest};
pub use idempotency::{compute_idempotency_key, should_skip};
pub use offline_guard::scan_processor_file;
pub use retry::{backoff_delay, run_with_retry, RetryOutcome};
pub use run::run_pipeline;
pub use spec_loader::load_pipeline_spec;
pub use stage::run_stage;
