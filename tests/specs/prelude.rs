//! Test helpers for the pipeline-runner behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// A throwaway pipeline root: `pipeline.json` plus whatever `state/`,
/// `locks/`, input, and output files a scenario writes into it.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a text file at `path` relative to the pipeline root, creating
    /// parent directories as needed.
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(full_path, content).expect("write file");
    }

    /// Write a shell script at `path` relative to the pipeline root and mark
    /// it executable. `#!/bin/sh` is prepended automatically.
    pub fn processor(&self, path: impl AsRef<Path>, body: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&full_path, format!("#!/bin/sh\nset -e\n{body}\n")).expect("write script");
        set_executable(&full_path);
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.dir.path().join(path.as_ref())).expect("read file")
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.dir.path().join(path.as_ref()).exists()
    }

    pub fn read_json(&self, path: impl AsRef<Path>) -> serde_json::Value {
        serde_json::from_str(&self.read(path)).expect("parse json")
    }

    /// Build a `pipeline-runner` invocation rooted at this project.
    pub fn run(&self, run_id: &str) -> Command {
        let mut cmd = Command::cargo_bin("pipeline-runner").expect("binary builds");
        cmd.arg("--pipeline")
            .arg(self.dir.path().join("pipeline.json"))
            .arg("--run-id")
            .arg(run_id);
        cmd
    }

    pub fn run_validate_offline(&self) -> Command {
        let mut cmd = Command::cargo_bin("pipeline-runner").expect("binary builds");
        cmd.arg("--pipeline")
            .arg(self.dir.path().join("pipeline.json"))
            .arg("--run-id")
            .arg("validate")
            .arg("--validate-offline");
        cmd
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path).expect("stat script").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("chmod script");
}

/// Fixture: 100 lines, "line 0".."line 99".
pub fn sample_lines(n: usize) -> String {
    (0..n)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
