//! Scenario 3: checkpoint resume.

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
      "outputDir": "data/output",
      "checkpoint": { "enabled": true, "lineInterval": 10 }
    }
  ]
}
"#;

#[test]
fn deleted_marker_with_a_progress_file_resumes_from_the_recorded_offset() {
    let project = Project::empty();
    project.file("pipeline.json", PIPELINE);
    project.file("data/input/sample.txt", &sample_lines(100));
    project.processor("processors/copy.sh", r#"cp "$1" "$PIPELINE_OUTPUT_DIR/copied.txt""#);
    project.processor(
        "processors/upper.sh",
        r#"
echo "offset=$PIPELINE_LINE_OFFSET" > "$PIPELINE_OUTPUT_DIR/offset_seen.txt"
tr '[:lower:]' '[:upper:]' < "$1" > "$PIPELINE_OUTPUT_DIR/result.txt"
"#,
    );

    project.run("demo1").assert().success();

    project.file("state/progress_stage_upper.json", r#"{"lineOffset": 50}"#);
    std::fs::remove_file(project.path().join("data/output/.stage_upper.done"))
        .expect("remove completion marker");

    project.run("demo3").assert().success();

    assert_eq!(project.read("data/output/offset_seen.txt").trim(), "offset=50");
    assert!(project.exists("data/output/.stage_upper.done"));

    let run_record = project.read_json("state/run_demo3.json");
    assert_eq!(run_record["state"], "completed");
}
