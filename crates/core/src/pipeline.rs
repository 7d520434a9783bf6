// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pipeline declaration (§6): what `pr-engine`'s spec loader parses and
//! validates before a run starts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A fully loaded, validated pipeline declaration. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub name: String,
    pub version: String,
    pub stages: Vec<StageSpec>,
}

/// One stage of a pipeline. Unknown JSON keys are tolerated (§4.1): this
/// struct is deserialized without `deny_unknown_fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSpec {
    pub name: String,
    pub processor: PathBuf,
    pub inputs: Vec<PathBuf>,
    #[serde(rename = "outputDir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub idempotency: IdempotencyConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdempotencyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_line_interval")]
    pub line_interval: u64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            line_interval: default_line_interval(),
        }
    }
}

fn default_line_interval() -> u64 {
    100
}

/// Bounded exponential backoff policy (§4.7).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay")]
    pub base_delay: f64,
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
            jitter: default_jitter(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay() -> f64 {
    0.5
}

fn default_jitter() -> f64 {
    0.1
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
