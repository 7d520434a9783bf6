// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run Orchestrator (§4.10): sequential stage iteration, abort-on-first-
//! failure, and the single end-of-run `MetricsDocument` write.

use crate::error::RunError;
use crate::stage::run_stage;
use chrono::Utc;
use pr_core::{
    format_elapsed, MetricsDocument, PathLayout, PipelineSpec, RunId, RunRecord, RunState,
    StageStatus,
};
use pr_storage::{write_metrics_document, write_run_record};

/// Run every stage of `spec` in declaration order. Returns the final
/// `RunRecord` (already persisted) regardless of whether the run completed
/// or a stage failed; only unexpected storage/stage-machinery errors
/// propagate as `Err`.
pub async fn run_pipeline(
    layout: &PathLayout,
    run_id: &RunId,
    spec: &PipelineSpec,
) -> Result<RunRecord, RunError> {
    let run_record_path = layout.run_record(run_id.as_str());
    let started_at = Utc::now();

    write_run_record(
        &run_record_path,
        &RunRecord {
            run_id: run_id.as_str().to_string(),
            pipeline_name: spec.name.clone(),
            pipeline_version: spec.version.clone(),
            state: RunState::Running,
            started_at,
            ended_at: None,
            duration_sec: None,
        },
    )?;

    tracing::info!(run_id = %run_id, pipeline = %spec.name, stages = spec.stages.len(), "run started");

    let mut metrics = Vec::with_capacity(spec.stages.len());
    let mut failed = false;
    for stage in &spec.stages {
        let metric = run_stage(layout, run_id, stage).await?;
        let is_failure = metric.status == StageStatus::Failed;
        metrics.push(metric);
        if is_failure {
            failed = true;
            break;
        }
    }

    let ended_at = Utc::now();
    let final_state = if failed {
        RunState::Failed
    } else {
        RunState::Completed
    };

    let metrics_document = MetricsDocument::aggregate(
        run_id.as_str(),
        &spec.name,
        &spec.version,
        ended_at,
        metrics,
    );
    write_metrics_document(&layout.metrics_document(run_id.as_str()), &metrics_document)?;

    let final_record = RunRecord {
        run_id: run_id.as_str().to_string(),
        pipeline_name: spec.name.clone(),
        pipeline_version: spec.version.clone(),
        state: final_state,
        started_at,
        ended_at: Some(ended_at),
        duration_sec: Some((ended_at - started_at).num_milliseconds() as f64 / 1000.0),
    };
    write_run_record(&run_record_path, &final_record)?;

    tracing::info!(
        run_id = %run_id,
        state = ?final_state,
        ok = metrics_document.ok_stages,
        skipped = metrics_document.skipped_stages,
        failed = metrics_document.failed_stages,
        elapsed = %format_elapsed((ended_at - started_at).num_seconds().max(0) as u64),
        "run finished"
    );

    Ok(final_record)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
