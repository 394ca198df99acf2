//! Drives the engine through the library API against a real directory tree.

use std::fs;
use std::path::Path;

use jobconf::adapters::LocalFilesystem;
use jobconf::domain::{GeneratorConfig, PathsConfig};
use jobconf::{JobError, Selection, WriteStatus, services};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(root: &Path) -> GeneratorConfig {
    GeneratorConfig {
        paths: PathsConfig {
            templates: root.join("tpl"),
            overrides: root.join("ov"),
            output: root.join("out"),
        },
        ..Default::default()
    }
}

#[test]
fn nested_jobs_mirror_their_path_in_output() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(&root.join("tpl/audience/daily/Rollup/config.yml.j2"), "ns: \"{{ data_namespace }}\"\n");
    write(&root.join("ov/test/t1/audience/daily/Rollup/config.yml"), "");

    let report =
        services::generate(&LocalFilesystem::new(), &config(root), &Selection::all()).unwrap();

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.written[0].job, "daily/Rollup");
    assert_eq!(report.written[0].status, WriteStatus::Written);
    assert_eq!(
        fs::read_to_string(root.join("out/test/t1/audience/daily/Rollup/config.yml")).unwrap(),
        "ns: test/t1\n"
    );
}

#[test]
fn invalid_override_fails_only_that_job() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(&root.join("tpl/groupA/job1/config.yml.j2"), "a: 1\n");
    write(&root.join("tpl/groupA/job2/config.yml.j2"), "b: 2\n");
    write(&root.join("ov/prod/groupA/job1/config.yml"), "- not\n- a mapping\n");

    let report =
        services::generate(&LocalFilesystem::new(), &config(root), &Selection::all()).unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, JobError::InvalidOverride { .. }));
    assert_eq!(report.written.len(), 1);
    assert!(root.join("out/prod/groupA/job2/config.yml").exists());
}
