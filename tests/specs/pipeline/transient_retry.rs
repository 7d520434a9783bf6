//! Scenario 4: transient failure (exit 10) is retried, then succeeds.

use crate::prelude::*;

const PIPELINE: &str = r#"
{
  "name": "demo",
  "version": "1",
  "stages": [
    {
      "name": "stage_flaky",
      "processor": "processors/flaky.sh",
      "inputs": [],
      "outputDir": "work",
      "retry": { "maxAttempts": 3, "baseDelay": 0.05, "jitter": 0.0 }
    }
  ]
}
"#;

#[test]
fn transient_exit_code_is_retried_exactly_once_before_succeeding() {
    let project = Project::empty();
    project.file("pipeline.json", PIPELINE);
    project.processor(
        "processors/flaky.sh",
        r#"
counter="$PIPELINE_OUTPUT_DIR/.attempts"
attempts=0
if [ -f "$counter" ]; then attempts=$(cat "$counter"); fi
attempts=$((attempts + 1))
echo "$attempts" > "$counter"
if [ "$attempts" -lt 2 ]; then
  exit 10
fi
touch "$PIPELINE_OUTPUT_DIR/succeeded.txt"
"#,
    );

    project.run("demo1").assert().success();

    assert!(project.exists("work/succeeded.txt"));
    assert_eq!(project.read("work/.attempts").trim(), "2");

    let stage_record = project.read_json("state/stage_stage_flaky.json");
    assert_eq!(stage_record["attempts"], 2);
    assert_eq!(stage_record["last_status"], "ok");
}
