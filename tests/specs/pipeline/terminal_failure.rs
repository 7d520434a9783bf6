//! Scenario 5: terminal failure halts the rest of the pipeline.

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
fn missing_processor_fails_its_stage_and_the_next_stage_is_never_attempted() {
    let project = Project::empty();
    project.file("pipeline.json", PIPELINE);
    project.file("data/input/sample.txt", &sample_lines(100));
    project.processor("processors/copy.sh", r#"cp "$1" "$PIPELINE_OUTPUT_DIR/copied.txt""#);
    project.processor(
        "processors/upper.sh",
        r#"tr '[:lower:]' '[:upper:]' < "$1" > "$PIPELINE_OUTPUT_DIR/result.txt""#,
    );

    project.run("demo1").assert().success();
    let upper_record_before = project.read("state/stage_stage_upper.json");

    std::fs::remove_file(project.path().join("processors/copy.sh")).expect("remove processor");

    project.run("demo5").assert().failure();

    let metrics = project.read_json("state/metrics_demo5.json");
    assert_eq!(metrics["total_stages"], 1);
    assert_eq!(metrics["ok_stages"], 0);
    assert_eq!(metrics["failed_stages"], 1);
    assert_eq!(metrics["stages"][0]["stage"], "stage_copy");

    let run_record = project.read_json("state/run_demo5.json");
    assert_eq!(run_record["state"], "failed");

    // stage_upper was never attempted: its last recorded state is still
    // whatever the successful first run left behind.
    assert_eq!(project.read("state/stage_stage_upper.json"), upper_record_before);

    // No completion marker was written or removed for either stage.
    assert!(project.exists("work/.stage_copy.done"));
    assert!(project.exists("data/output/.stage_upper.done"));
}
