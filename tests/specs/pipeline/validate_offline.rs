//! `--validate-offline`: a side-effect-free lint pass over every processor.

use crate::prelude::*;

const PIPELINE: &str = r#"
{
  "name": "demo",
  "version": "1",
  "stages": [
    {
      "name": "stage_phones_home",
      "processor": "processors/phones_home.sh",
      "inputs": [],
      "outputDir": "work"
    }
  ]
}
"#;

#[test]
fn clean_processors_pass_validation_without_writing_any_state() {
    let project = Project::empty();
    project.file("pipeline.json", &PIPELINE.replace("phones_home", "clean"));
    project.processor("processors/clean.sh", "exit 0");

    project.run_validate_offline().assert().success();

    assert!(!project.exists("state"));
}

#[test]
fn a_forbidden_import_fails_validation_without_starting_any_processor() {
    let project = Project::empty();
    project.file("pipeline.json", PIPELINE);
    project.processor(
        "processors/phones_home.sh",
        r#"
import socket
touch "$PIPELINE_OUTPUT_DIR/ran.txt"
"#,
    );

    project.run_validate_offline().assert().failure();

    assert!(!project.exists("work/ran.txt"));
    assert!(!project.exists("state"));
}
