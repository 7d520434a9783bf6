// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage State Machine (§4.9): `pending → {skipped | locked → running →
//! (retrying)* → {ok | failed}}`, one stage at a time.
//!
//! The offline scan runs once per stage, immediately before lock
//! acquisition, on the non-skip path only: a stage whose idempotency key
//! and completion marker already match never has its processor source read
//! or scanned.
//!
//! Expected stage failures (offline violation, missing processor, lock
//! timeout, processor exit) never propagate as `Err` — they become a
//! `Failed` tagged-variant `StageMetric`. `Err(StageError)` is reserved for
//! failures to persist our own state, which leave the orchestrator unable
//! to trust what it just did.

use crate::error::StageError;
use crate::executor::{self, ExecutionOutcome, ExecutionRequest};
use crate::idempotency::{compute_idempotency_key, should_skip};
use crate::offline_guard;
use crate::retry::run_with_retry;
use chrono::Utc;
use pr_core::{
    format_elapsed_ms, PathLayout, RunId, StageMetric, StageRecord, StageSpec, StageStatus,
};
use pr_storage::{
    load_checkpoint, load_stage_record, marker_exists, read_processor_mtime, write_marker,
    write_stage_record, StageLock, DEFAULT_LOCK_TIMEOUT,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Run one stage to a terminal outcome: `skipped`, `ok`, or `failed`.
pub async fn run_stage(
    layout: &PathLayout,
    run_id: &RunId,
    stage: &StageSpec,
) -> Result<StageMetric, StageError> {
    let span = tracing::info_span!("stage", stage = %stage.name, run_id = %run_id);
    let _guard = span.enter();
    let result = run_stage_inner(layout, run_id, stage).await;
    match &result {
        Ok(metric) => {
            let elapsed = format_elapsed_ms((metric.duration_sec.unwrap_or(0.0) * 1000.0) as u64);
            tracing::info!(status = ?metric.status, elapsed = %elapsed, "stage finished");
        }
        Err(err) => tracing::error!(error = %err, "stage aborted the run"),
    }
    result
}

async fn run_stage_inner(
    layout: &PathLayout,
    run_id: &RunId,
    stage: &StageSpec,
) -> Result<StageMetric, StageError> {
    let processor_path = layout.absolute(&stage.processor);
    let stage_record_path = layout.stage_record(&stage.name);
    let previous = load_stage_record(&stage_record_path)?;

    let processor_version = match read_processor_mtime(&processor_path) {
        Ok(version) => version,
        Err(err) => {
            return fail(
                &stage_record_path,
                stage,
                previous,
                0,
                None,
                format!("processor not found at {}: {err}", processor_path.display()),
            );
        }
    };

    let input_paths: Vec<_> = stage.inputs.iter().map(|p| layout.absolute(p)).collect();
    let fresh_key = compute_idempotency_key(&input_paths, &processor_version, &stage.params);
    let marker_path = layout.completion_marker(&stage.output_dir, &stage.name);
    let marker_present = marker_exists(&marker_path);

    if should_skip(
        stage.idempotency.enabled,
        previous.as_ref(),
        &fresh_key,
        marker_present,
    ) {
        return skip(&stage_record_path, stage, previous);
    }

    match offline_guard::scan_processor_file(&processor_path) {
        Ok(Some(module)) => {
            return fail(
                &stage_record_path,
                stage,
                previous,
                0,
                None,
                format!("processor imports forbidden module {module:?}"),
            );
        }
        Ok(None) => {}
        Err(io_err) => {
            return fail(
                &stage_record_path,
                stage,
                previous,
                0,
                None,
                format!("failed to read processor for offline scan: {io_err}"),
            );
        }
    }

    let lock_path = layout.lock_file(&stage.name);
    let lock = match StageLock::acquire(&lock_path, DEFAULT_LOCK_TIMEOUT).await {
        Ok(lock) => lock,
        Err(err) => {
            return fail(&stage_record_path, stage, previous, 0, None, err.to_string());
        }
    };

    let checkpoint_path = layout.progress_file(&stage.name);
    let checkpoint = load_checkpoint(&checkpoint_path)?;
    let env = build_env(run_id, stage, layout, checkpoint.line_offset);

    let output_dir = layout.absolute(&stage.output_dir);
    if let Err(io_err) = std::fs::create_dir_all(&output_dir) {
        lock.release();
        return fail(
            &stage_record_path,
            stage,
            previous,
            0,
            None,
            format!("failed to create output directory {}: {io_err}", output_dir.display()),
        );
    }

    let started = Instant::now();
    let retry_outcome = run_with_retry(&stage.retry, |_attempt| {
        let request = ExecutionRequest {
            processor: &processor_path,
            inputs: &input_paths,
            working_dir: layout.root(),
            env: env.clone(),
        };
        executor::execute(request)
    })
    .await;
    let elapsed = started.elapsed().as_secs_f64();

    lock.release();

    match retry_outcome.outcome {
        ExecutionOutcome::Success => {
            write_marker(&marker_path)?;
            let record = StageRecord {
                stage: stage.name.clone(),
                last_status: StageStatus::Ok,
                last_duration_sec: elapsed,
                last_completed_at: Utc::now(),
                idempotency_key: Some(fresh_key),
                last_error: None,
                attempts: retry_outcome.attempts,
            };
            write_stage_record(&stage_record_path, &record)?;
            Ok(StageMetric {
                stage: stage.name.clone(),
                status: StageStatus::Ok,
                duration_sec: Some(elapsed),
                error: None,
            })
        }
        ExecutionOutcome::Transient { detail, .. } | ExecutionOutcome::Terminal { detail, .. } => {
            fail(
                &stage_record_path,
                stage,
                previous,
                retry_outcome.attempts,
                Some(elapsed),
                detail,
            )
        }
    }
}

fn build_env(
    run_id: &RunId,
    stage: &StageSpec,
    layout: &PathLayout,
    line_offset: u64,
) -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert("PIPELINE_STAGE_NAME".to_string(), stage.name.clone());
    env.insert(
        "PIPELINE_OUTPUT_DIR".to_string(),
        layout.absolute(&stage.output_dir).display().to_string(),
    );
    env.insert("PIPELINE_RUN_ID".to_string(), run_id.as_str().to_string());
    env.insert("PIPELINE_LINE_OFFSET".to_string(), line_offset.to_string());
    env.insert(
        "PIPELINE_PARAMS".to_string(),
        serde_json::to_string(&stage.params).unwrap_or_else(|_| "{}".to_string()),
    );
    env
}

/// `pending → skipped`: does not touch `idempotencyKey` (§4.9); keeps
/// whichever value the previous terminal outcome left behind.
fn skip(
    stage_record_path: &Path,
    stage: &StageSpec,
    previous: Option<StageRecord>,
) -> Result<StageMetric, StageError> {
    let record = StageRecord {
        stage: stage.name.clone(),
        last_status: StageStatus::Skipped,
        last_duration_sec: 0.0,
        last_completed_at: Utc::now(),
        idempotency_key: previous.and_then(|r| r.idempotency_key),
        last_error: None,
        attempts: 0,
    };
    write_stage_record(stage_record_path, &record)?;
    Ok(StageMetric {
        stage: stage.name.clone(),
        status: StageStatus::Skipped,
        duration_sec: None,
        error: None,
    })
}

/// `running → failed` (or a pre-lock failure): the completion marker is
/// untouched and `idempotencyKey` keeps its prior value (§4.9).
fn fail(
    stage_record_path: &Path,
    stage: &StageSpec,
    previous: Option<StageRecord>,
    attempts: u32,
    duration_sec: Option<f64>,
    detail: String,
) -> Result<StageMetric, StageError> {
    let record = StageRecord {
        stage: stage.name.clone(),
        last_status: StageStatus::Failed,
        last_duration_sec: duration_sec.unwrap_or(0.0),
        last_completed_at: Utc::now(),
        idempotency_key: previous.and_then(|r| r.idempotency_key),
        last_error: Some(detail.clone()),
        attempts,
    };
    write_stage_record(stage_record_path, &record)?;
    Ok(StageMetric {
        stage: stage.name.clone(),
        status: StageStatus::Failed,
        duration_sec,
        error: Some(detail),
    })
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
