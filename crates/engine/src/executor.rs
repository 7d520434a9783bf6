// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor (§4.6): spawns the processor as a child process, captures exit
//! code and bounded output tails. Upstream code never touches process
//! primitives directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Per-attempt wall-clock budget (§4.6).
pub const EXECUTION_TIMEOUT: Duration = Duration::from_secs(300);

/// Bound on captured stdout/stderr retained in an error detail (§4.6).
const TAIL_BYTES: usize = 4096;

const EXIT_TRANSIENT: i32 = 10;

/// A single processor invocation, already resolved to concrete argv/env/cwd.
pub struct ExecutionRequest<'a> {
    pub processor: &'a Path,
    pub inputs: &'a [PathBuf],
    pub working_dir: &'a Path,
    pub env: HashMap<String, String>,
}

/// The classified result of one attempt, per §4.6's exit-code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Transient {
        exit_code: Option<i32>,
        detail: String,
    },
    Terminal {
        exit_code: Option<i32>,
        detail: String,
    },
}

/// Run one attempt under the default §4.6 timeout.
pub async fn execute(request: ExecutionRequest<'_>) -> ExecutionOutcome {
    execute_with_timeout(request, EXECUTION_TIMEOUT).await
}

/// Run one attempt under an explicit timeout (tests use a short one).
///
/// Wraps `Command::output()` with `tokio::time::timeout`; a child that
/// never started (e.g. the processor file is not executable) is a terminal
/// failure, a timeout is transient, and the exit code otherwise drives
/// `classify_exit`.
pub async fn execute_with_timeout(
    request: ExecutionRequest<'_>,
    timeout: Duration,
) -> ExecutionOutcome {
    let mut cmd = Command::new(request.processor);
    cmd.args(request.inputs)
        .current_dir(request.working_dir)
        .envs(&request.env)
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => classify_exit(output.status.code(), &output.stdout, &output.stderr),
        Ok(Err(io_err)) => ExecutionOutcome::Terminal {
            exit_code: None,
            detail: format!("processor did not start: {io_err}"),
        },
        Err(_elapsed) => ExecutionOutcome::Transient {
            exit_code: None,
            detail: format!(
                "processor execution exceeded {}s timeout",
                timeout.as_secs()
            ),
        },
    }
}

fn classify_exit(code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> ExecutionOutcome {
    match code {
        Some(0) => ExecutionOutcome::Success,
        Some(EXIT_TRANSIENT) => ExecutionOutcome::Transient {
            exit_code: code,
            detail: format_detail(stdout, stderr),
        },
        _ => ExecutionOutcome::Terminal {
            exit_code: code,
            detail: format_detail(stdout, stderr),
        },
    }
}

fn format_detail(stdout: &[u8], stderr: &[u8]) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        tail(stdout, TAIL_BYTES),
        tail(stderr, TAIL_BYTES)
    )
}

fn tail(bytes: &[u8], max: usize) -> String {
    let start = bytes.len().saturating_sub(max);
    String::from_utf8_lossy(&bytes[start..]).into_owned()
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
