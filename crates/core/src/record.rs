// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted state documents (§3): everything `pr-storage` writes atomically
//! and `pr-engine` reads back across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal lifecycle state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Running,
    Completed,
    Failed,
}

/// Keyed by `runId`. Written once at run start (`Running`) and once at run
/// end (`Completed`/`Failed`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub pipeline_name: String,
    pub pipeline_version: String,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Derived convenience field, computed at write time from
    /// `ended_at - started_at`.
    pub duration_sec: Option<f64>,
}

/// Outcome of a stage's most recent terminal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    Skipped,
    Failed,
}

/// Keyed by stage name, process-wide (not run-scoped) — this is what makes
/// cross-run idempotency possible (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: String,
    pub last_status: StageStatus,
    pub last_duration_sec: f64,
    pub last_completed_at: DateTime<Utc>,
    pub idempotency_key: Option<String>,
    pub last_error: Option<String>,
    /// Executor attempts made during the most recent terminal outcome.
    pub attempts: u32,
}

/// One entry in a `MetricsDocument`'s per-stage outcome list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageMetric {
    pub stage: String,
    pub status: StageStatus,
    pub duration_sec: Option<f64>,
    pub error: Option<String>,
}

/// Keyed by `runId`. Written exactly once, at run termination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsDocument {
    pub run_id: String,
    pub pipeline_name: String,
    pub pipeline_version: String,
    pub timestamp: DateTime<Utc>,
    pub stages: Vec<StageMetric>,
    pub total_stages: usize,
    pub ok_stages: usize,
    pub skipped_stages: usize,
    pub failed_stages: usize,
}

impl MetricsDocument {
    /// Pure aggregation (§4.11): no I/O, independently unit-testable.
    pub fn aggregate(
        run_id: &str,
        pipeline_name: &str,
        pipeline_version: &str,
        now: DateTime<Utc>,
        stages: Vec<StageMetric>,
    ) -> Self {
        let ok_stages = stages.iter().filter(|s| s.status == StageStatus::Ok).count();
        let skipped_stages = stages
            .iter()
            .filter(|s| s.status == StageStatus::Skipped)
            .count();
        let failed_stages = stages
            .iter()
            .filter(|s| s.status == StageStatus::Failed)
            .count();
        Self {
            run_id: run_id.to_string(),
            pipeline_name: pipeline_name.to_string(),
            pipeline_version: pipeline_version.to_string(),
            timestamp: now,
            total_stages: stages.len(),
            ok_stages,
            skipped_stages,
            failed_stages,
            stages,
        }
    }
}

/// Keyed by stage name. The only artifact the orchestrator does not own
/// exclusively: the processor writes new offsets, the orchestrator only
/// reads at start (§3, §4.5).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub line_offset: u64,
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self { line_offset: 0 }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
