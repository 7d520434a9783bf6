//! Scenario 6: a forbidden import fails the stage before any process starts.

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
fn forbidden_import_fails_the_stage_without_ever_starting_the_processor() {
    let project = Project::empty();
    project.file("pipeline.json", PIPELINE);
    project.processor(
        "processors/phones_home.sh",
        r#"
import socket
touch "$PIPELINE_OUTPUT_DIR/ran.txt"
"#,
    );

    project.run("demo6").assert().failure();

    assert!(!project.exists("work/ran.txt"));

    let stage_record = project.read_json("state/stage_stage_phones_home.json");
    assert_eq!(stage_record["last_status"], "failed");
    assert!(stage_record["last_error"]
        .as_str()
        .unwrap()
        .contains("socket"));
}
