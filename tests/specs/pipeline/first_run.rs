//! Scenario 1: first run from clean state.

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
fn first_run_copies_then_uppercases_and_records_two_ok_stages() {
    let project = Project::empty();
    project.file("pipeline.json", PIPELINE);
    project.file("data/input/sample.txt", &sample_lines(100));
    project.processor("processors/copy.sh", r#"cp "$1" "$PIPELINE_OUTPUT_DIR/copied.txt""#);
    project.processor(
        "processors/upper.sh",
        r#"tr '[:lower:]' '[:upper:]' < "$1" > "$PIPELINE_OUTPUT_DIR/result.txt""#,
    );

    project.run("demo1").assert().success();

    let result = project.read("data/output/result.txt");
    let expected: String = sample_lines(100).to_uppercase();
    assert_eq!(result, expected);

    assert!(project.exists("work/.stage_copy.done"));
    assert!(project.exists("data/output/.stage_upper.done"));

    let metrics = project.read_json("state/metrics_demo1.json");
    assert_eq!(metrics["ok_stages"], 2);
    assert_eq!(metrics["skipped_stages"], 0);
    assert_eq!(metrics["failed_stages"], 0);
    assert_eq!(metrics["total_stages"], 2);
}
