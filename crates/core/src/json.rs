// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic JSON serialization.
//!
//! `serde_json::Map` is a `BTreeMap` by default (the `preserve_order` feature,
//! which would switch it to an `IndexMap`, is never enabled in this workspace),
//! so `Value::Object` already serializes with keys in lexicographic order at
//! every nesting level. `canonical_json` just names that guarantee so callers
//! don't have to re-derive it.

use serde::Serialize;

/// Serialize `value` to JSON with object keys in lexicographic order.
///
/// Used to fold the free-form stage parameter map into the idempotency key
/// (§4.3) and anywhere else a document's bytes must be stable across
/// semantically-identical inputs.
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
