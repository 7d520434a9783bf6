// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spec Loader & Validator (§4.1).

use crate::error::SpecError;
use pr_core::{PathLayout, PipelineSpec};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// `^[A-Za-z0-9_-]+$`, checked without pulling in a regex dependency for one
/// anchored character class.
fn is_valid_stage_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Load and validate a pipeline declaration from `path` (§4.1).
///
/// `layout` resolves relative processor paths against the pipeline root;
/// input paths are not required to exist (they may be produced by earlier
/// stages within the same run).
pub fn load_pipeline_spec(path: &Path, layout: &PathLayout) -> Result<PipelineSpec, SpecError> {
    let bytes = fs::read(path).map_err(|source| SpecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let spec: PipelineSpec = serde_json::from_slice(&bytes)?;
    validate(&spec, layout)?;
    Ok(spec)
}

fn validate(spec: &PipelineSpec, layout: &PathLayout) -> Result<(), SpecError> {
    if spec.stages.is_empty() {
        return Err(SpecError::NoStages);
    }

    let mut seen = HashSet::new();
    for stage in &spec.stages {
        if !is_valid_stage_name(&stage.name) {
            return Err(SpecError::InvalidStageName(stage.name.clone()));
        }
        if !seen.insert(stage.name.clone()) {
            return Err(SpecError::DuplicateStageName(stage.name.clone()));
        }
        let processor_path = layout.absolute(&stage.processor);
        if !processor_path.is_file() {
            return Err(SpecError::ProcessorNotFound {
                stage: stage.name.clone(),
                processor: processor_path,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "spec_loader_tests.rs"]
mod tests;
