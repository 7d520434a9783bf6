// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pipeline-runner: a single-shot, strictly offline batch pipeline orchestrator.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use pr_core::{PathLayout, RunId, RunState};
use pr_engine::{load_pipeline_spec, run_pipeline, scan_processor_file};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "pipeline-runner",
    version,
    about = "Runs a declared pipeline of offline batch stages"
)]
struct Cli {
    /// Path to the pipeline declaration (JSON).
    #[arg(long)]
    pipeline: PathBuf,

    /// Identifier for this run; keyed into run_{id}.json and metrics_{id}.json.
    #[arg(long = "run-id")]
    run_id: String,

    /// Lint every stage's processor for forbidden imports and exit without
    /// running anything.
    #[arg(long)]
    validate_offline: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            let msg = format_error(&err);
            if !msg.is_empty() {
                eprintln!("Error: {msg}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let pipeline_root = cli
        .pipeline
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let layout = PathLayout::new(pipeline_root);

    let spec = load_pipeline_spec(&cli.pipeline, &layout)
        .with_context(|| format!("loading pipeline declaration at {}", cli.pipeline.display()))?;

    if cli.validate_offline {
        return validate_offline(&layout, &spec);
    }

    let run_id = RunId::new(cli.run_id);
    let record = run_pipeline(&layout, &run_id, &spec)
        .await
        .context("running pipeline")?;

    Ok(match record.state {
        RunState::Completed => ExitCode::SUCCESS,
        RunState::Failed | RunState::Running => ExitCode::FAILURE,
    })
}

/// `--validate-offline`: lint every stage's processor up front and exit
/// without writing any run artifacts (§6).
fn validate_offline(layout: &PathLayout, spec: &pr_core::PipelineSpec) -> Result<ExitCode> {
    for stage in &spec.stages {
        let processor_path = layout.absolute(&stage.processor);
        let hit = scan_processor_file(&processor_path).with_context(|| {
            format!(
                "reading processor {} for stage {}",
                processor_path.display(),
                stage.name
            )
        })?;
        if let Some(module) = hit {
            eprintln!(
                "stage {}: processor imports forbidden module {module:?}",
                stage.name
            );
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Format an anyhow error, deduplicating the chain when the top-level
/// `Display` already contains every source message (common with `thiserror`
/// `#[from]` variants whose message embeds `{0}`).
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {i}: {cause}"));
    }
    buf
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
