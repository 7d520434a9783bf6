//! Scenario 2: immediate re-run with no filesystem changes skips every
//! idempotency-enabled stage.

use crate::prelude::*;

const PIPELINE: &str = r#"
{
  "name": "demo",
  "version": "1",
  "stages": [
    {
      "name": "stage_copy",
      "processor": "processors/copy.sh",
      "inputs": ["data/input/sample.txt"],
      "outputDir": "work"
    },
    {
      "name": "stage_upper",
      "processor": "processors/upper.sh",
      "inputs": ["work/copied.txt"],
      "outputDir": "data/output"
    }
  ]
}
"#;

#[test]
fn rerun_over_unchanged_state_skips_every_stage() {
    let project = Project::empty();
    project.file("pipeline.json", PIPELINE);
    project.file("data/input/sample.txt", &sample_lines(100));
    project.processor("processors/copy.sh", r#"cp "$1" "$PIPELINE_OUTPUT_DIR/copied.txt""#);
    project.processor(
        "processors/upper.sh",
        r#"tr '[:lower:]' '[:upper:]' < "$1" > "$PIPELINE_OUTPUT_DIR/result.txt""#,
    );

    project.run("demo1").assert().success();
    let markers_before = (
        project.read("work/.stage_copy.done"),
        project.read("data/output/.stage_upper.done"),
    );

    project.run("demo2").assert().success();

    let metrics = project.read_json("state/metrics_demo2.json");
    assert_eq!(metrics["ok_stages"], 0);
    assert_eq!(metrics["skipped_stages"], 2);
    assert_eq!(metrics["failed_stages"], 0);

    assert_eq!(project.read("work/.stage_copy.done"), markers_before.0);
    assert_eq!(
        project.read("data/output/.stage_upper.done"),
        markers_before.1
    );
}
