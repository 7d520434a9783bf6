// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry Controller (§4.7): bounded exponential backoff with multiplicative
//! jitter around a single stage attempt.

use crate::executor::ExecutionOutcome;
use pr_core::RetryPolicy;
use std::future::Future;
use std::time::Duration;

/// The final outcome of a (possibly retried) stage attempt sequence, plus
/// how many attempts it took. §3.1 persists `attempts` on the stage record.
pub struct RetryOutcome {
    pub outcome: ExecutionOutcome,
    pub attempts: u32,
}

/// Pre-attempt delay for attempt `n` (1-indexed) under `policy`.
///
/// Attempt 1 is never delayed. For `n > 1`: `baseDelay * 2^(n-1)` plus a
/// jitter term drawn uniformly from `[0, baseDelay * 2^(n-1) * jitter]`,
/// where `unit_sample` supplies that `[0, 1)` draw (§4.7).
pub fn backoff_delay(attempt: u32, policy: &RetryPolicy, unit_sample: f64) -> Duration {
    if attempt <= 1 {
        return Duration::ZERO;
    }
    let exponential = policy.base_delay * 2f64.powi((attempt - 1) as i32);
    let jitter = exponential * policy.jitter * unit_sample;
    Duration::from_secs_f64((exponential + jitter).max(0.0))
}

/// Run `attempt_fn` up to `policy.max_attempts` times, sleeping for
/// `backoff_delay` between retries. Only `Transient` outcomes are retried;
/// `Success` and `Terminal` both end the loop immediately (§4.7).
pub async fn run_with_retry<F, Fut>(policy: &RetryPolicy, mut attempt_fn: F) -> RetryOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ExecutionOutcome>,
{
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        if attempts > 1 {
            let delay = backoff_delay(attempts, policy, rand::random::<f64>());
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let outcome = attempt_fn(attempts).await;
        let should_retry =
            matches!(outcome, ExecutionOutcome::Transient { .. }) && attempts < policy.max_attempts;
        if !should_retry {
            return RetryOutcome { outcome, attempts };
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
