//! Shared testing utilities for jobconf CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated working directory with template and override roots.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Path to the directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled `jobconf` binary in the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("jobconf").expect("Failed to locate jobconf binary");
        cmd.current_dir(&self.work_dir).env_remove("RUST_LOG").env_remove("JOBCONF_WRITE_ENV");
        cmd
    }

    /// Write a template under `config-templates/`.
    pub fn write_template(&self, relative: &str, content: &str) {
        self.write(&self.work_dir.join("config-templates").join(relative), content);
    }

    /// Write an override file under `config-overrides/`.
    pub fn write_override(&self, relative: &str, content: &str) {
        self.write(&self.work_dir.join("config-overrides").join(relative), content);
    }

    /// Write a file relative to the work directory.
    pub fn write_file(&self, relative: &str, content: &str) {
        self.write(&self.work_dir.join(relative), content);
    }

    /// Path of an artifact under `configs/`.
    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.work_dir.join("configs").join(relative)
    }

    /// Read an artifact under `configs/`.
    pub fn read_output(&self, relative: &str) -> String {
        let path = self.output_path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Assert that no artifact tree was produced.
    pub fn assert_no_output(&self) {
        assert!(!self.work_dir.join("configs").exists(), "configs/ should not exist");
    }

    /// Seed the experiment scenario: one group, one job, one override.
    pub fn seed_experiment_scenario(&self, override_yaml: &str) {
        self.write_template(
            "groupA/job1/config.yml.j2",
            "foo: \"{{ foo }}\"\n\
             environment: \"{{ environment }}\"\n\
             ns: \"{{ data_namespace }}\"\n",
        );
        self.write_override("experiment/exp1/groupA/job1/config.yml", override_yaml);
    }

    fn write(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(path, content).expect("Failed to write test file");
    }

    /// Keep the temp root alive for the lifetime of the context.
    pub fn root(&self) -> &Path {
        self.root.path()
    }
}
