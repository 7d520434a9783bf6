// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotency Evaluator (§4.3): the key computation and the skip decision.

use pr_core::{canonical_json, StageRecord};
use sha2::{Digest, Sha256};
use std::path::Path;

const MISSING_INPUT_SENTINEL: &str = "missing";

/// Hex SHA-256 of a file's contents, or the literal `"missing"` sentinel
/// when the file does not exist (§4.3).
fn hash_input(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => format!("{:x}", Sha256::digest(&bytes)),
        Err(_) => MISSING_INPUT_SENTINEL.to_string(),
    }
}

/// `SHA256( H(input_1) || ... || H(input_n) || processorVersion || canonicalParams )`,
/// components joined with `|` before hashing (§4.3).
pub fn compute_idempotency_key(
    inputs: &[impl AsRef<Path>],
    processor_version: &str,
    params: &serde_json::Value,
) -> String {
    let mut parts: Vec<String> = inputs.iter().map(|p| hash_input(p.as_ref())).collect();
    parts.push(processor_version.to_string());
    // canonical_json never fails on a serde_json::Value.
    parts.push(canonical_json(params).unwrap_or_default());

    let joined = parts.join("|");
    format!("{:x}", Sha256::digest(joined.as_bytes()))
}

/// §4.3's skip decision: all three conditions must hold.
pub fn should_skip(
    idempotency_enabled: bool,
    previous_record: Option<&StageRecord>,
    fresh_key: &str,
    marker_exists: bool,
) -> bool {
    if !idempotency_enabled || !marker_exists {
        return false;
    }
    previous_record
        .and_then(|r| r.idempotency_key.as_deref())
        .is_some_and(|key| key == fresh_key)
}

#[cfg(test)]
#[path = "idempotency_tests.rs"]
mod tests;
