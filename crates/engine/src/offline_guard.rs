// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Offline Guard (§4.2): a pure function from a processor source path to a
//! pass/fail verdict naming the offending module, if any.

use std::path::Path;

/// Exactly the forbidden set from §4.2. No network-capable module may be
/// imported by a processor.
const FORBIDDEN_MODULES: &[&str] = &[
    "requests",
    "socket",
    "http",
    "http.client",
    "urllib",
    "urllib.request",
    "urllib.parse",
    "urllib.error",
    "urllib3",
    "aiohttp",
    "asyncio",
    "paramiko",
    "ftplib",
    "smtplib",
    "poplib",
    "imaplib",
    "telnetlib",
    "xmlrpc",
    "xmlrpc.client",
];

/// Scan `source` for a forbidden import. Returns the offending module name
/// on the first match, or `None` if the source is clean.
///
/// Recognizes lines that, after leading whitespace, begin with `import M` or
/// `from M import ...`, where `M` (or its dotted prefix up to the first
/// `.`) is in the forbidden set. This textual scan is the portable common
/// denominator across processor source languages -- a full AST parse would
/// require knowing the processor's language ahead of time.
pub fn scan_for_forbidden_import(source: &str) -> Option<&'static str> {
    for line in source.lines() {
        let trimmed = line.trim_start();
        let module = if let Some(rest) = trimmed.strip_prefix("import ") {
            first_token(rest)
        } else if let Some(rest) = trimmed.strip_prefix("from ") {
            first_token(rest)
        } else {
            continue;
        };

        let Some(module) = module else { continue };
        if let Some(hit) = matches_forbidden(module) {
            return Some(hit);
        }
    }
    None
}

fn first_token(rest: &str) -> Option<&str> {
    rest.split_whitespace().next()
}

fn matches_forbidden(module: &str) -> Option<&'static str> {
    let top_level = module.split('.').next().unwrap_or(module);
    FORBIDDEN_MODULES
        .iter()
        .find(|&&forbidden| forbidden == module || forbidden == top_level)
        .copied()
}

/// Scan a processor file on disk (§4.2's runtime entry point, invoked once
/// per stage immediately before execution).
pub fn scan_processor_file(path: &Path) -> std::io::Result<Option<&'static str>> {
    let source = std::fs::read_to_string(path)?;
    Ok(scan_for_forbidden_import(&source))
}

#[cfg(test)]
#[path = "offline_guard_tests.rs"]
mod tests;
