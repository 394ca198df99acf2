//! Override tree discovery.
//!
//! Layout: `<root>/<kind>[/<experiment>]/<group>/<job>/config.yml`. Adding a
//! new environment or group only requires dropping an override file into
//! place; nothing is registered anywhere else.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::{AppError, EnvKind, EnvironmentPath, OVERRIDE_FILE};
use crate::ports::FileStore;

/// Immutable snapshot of the override tree, taken once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTopology {
    root: PathBuf,
    groups: BTreeMap<EnvironmentPath, BTreeSet<String>>,
}

impl OverrideTopology {
    /// Scan `root`. A missing root yields an empty topology.
    pub fn scan<S: FileStore>(store: &S, root: &Path) -> Result<Self, AppError> {
        let mut groups = BTreeMap::new();
        if !store.is_dir(root) {
            warn!(root = %root.display(), "override root not found; no environments to render");
            return Ok(Self { root: root.to_path_buf(), groups });
        }

        for env_path in list_environment_paths(store, root)? {
            let active = list_active_groups(store, root, &env_path)?;
            debug!(environment = %env_path, groups = ?active, "discovered environment");
            groups.insert(env_path, active);
        }

        Ok(Self { root: root.to_path_buf(), groups })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn environment_paths(&self) -> impl Iterator<Item = &EnvironmentPath> {
        self.groups.keys()
    }

    /// Active groups for an environment path; empty when the path is unknown.
    pub fn active_groups(&self, env_path: &EnvironmentPath) -> impl Iterator<Item = &str> {
        self.groups.get(env_path).into_iter().flatten().map(String::as_str)
    }

    /// Conventional override file location for one job.
    pub fn override_file(&self, env_path: &EnvironmentPath, group: &str, job: &str) -> PathBuf {
        override_file(&self.root, env_path, group, job)
    }
}

/// `<root>/<env_path>/<group>/<job>/config.yml`.
pub fn override_file(root: &Path, env_path: &EnvironmentPath, group: &str, job: &str) -> PathBuf {
    let mut path = env_dir(root, env_path).join(group);
    path.extend(job.split('/'));
    path.join(OVERRIDE_FILE)
}

/// Directory holding the groups of one environment path.
pub fn env_dir(root: &Path, env_path: &EnvironmentPath) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(env_path.segments());
    path
}

/// Environment paths defined by the top two levels of the override tree.
///
/// Top-level directories name env kinds. `prod` is a path by itself; every
/// immediate subdirectory of an experiment-bearing kind is a separate path.
/// Files and unknown kinds are skipped.
pub fn list_environment_paths<S: FileStore>(
    store: &S,
    root: &Path,
) -> Result<BTreeSet<EnvironmentPath>, AppError> {
    let mut paths = BTreeSet::new();
    for entry in store.list_dir(root)?.into_iter().filter(|e| e.is_dir()) {
        let Some(kind) = EnvKind::from_dir_name(&entry.name) else {
            warn!(directory = %entry.path.display(), "skipping unknown environment kind");
            continue;
        };

        if !kind.requires_experiment() {
            paths.insert(EnvironmentPath::prod());
            continue;
        }

        for experiment in store.list_dir(&entry.path)?.into_iter().filter(|e| e.is_dir()) {
            match EnvironmentPath::with_experiment(kind, &experiment.name) {
                Some(path) => {
                    paths.insert(path);
                }
                None => warn!(directory = %experiment.path.display(), "skipping experiment"),
            }
        }
    }
    Ok(paths)
}

/// Groups under an environment path that hold at least one override file
/// anywhere in their subtree.
pub fn list_active_groups<S: FileStore>(
    store: &S,
    root: &Path,
    env_path: &EnvironmentPath,
) -> Result<BTreeSet<String>, AppError> {
    let dir = env_dir(root, env_path);
    let mut groups = BTreeSet::new();
    if !store.is_dir(&dir) {
        return Ok(groups);
    }

    for entry in store.list_dir(&dir)?.into_iter().filter(|e| e.is_dir()) {
        if contains_override_file(store, &entry.path)? {
            groups.insert(entry.name);
        } else {
            debug!(group = %entry.name, environment = %env_path, "group has no overrides");
        }
    }
    Ok(groups)
}

fn is_override_file(name: &str) -> bool {
    name.ends_with(".yml") || name.ends_with(".yaml")
}

fn contains_override_file<S: FileStore>(store: &S, dir: &Path) -> Result<bool, AppError> {
    for entry in store.list_dir(dir)? {
        if entry.is_dir() {
            if contains_override_file(store, &entry.path)? {
                return Ok(true);
            }
        } else if is_override_file(&entry.name) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryFilesystem;

    fn store() -> MemoryFilesystem {
        let store = MemoryFilesystem::new()
            .with_file("ov/prod/groupA/job1/config.yml", "a: 1")
            .with_file("ov/experiment/exp1/groupA/job1/config.yml", "a: 1")
            .with_file("ov/experiment/exp1/groupB/deep/nested/job2/config.yml", "b: 2")
            .with_file("ov/experiment/exp1/groupC/job3/README.md", "no overrides")
            .with_file("ov/experiment/exp2/groupA/job1/config.yml", "a: 1")
            .with_file("ov/experiment/stray.yml", "ignored")
            .with_file("ov/staging/x/groupA/job1/config.yml", "unknown kind")
            .with_file("ov/notes.txt", "ignored");
        store.create_dir("ov/test/t1");
        store
    }

    fn exp(name: &str) -> EnvironmentPath {
        EnvironmentPath::with_experiment(EnvKind::Experiment, name).unwrap()
    }

    #[test]
    fn environment_paths_follow_kind_rules() {
        let paths = list_environment_paths(&store(), Path::new("ov")).unwrap();
        let test_t1 = EnvironmentPath::with_experiment(EnvKind::Test, "t1").unwrap();
        assert_eq!(
            paths.into_iter().collect::<Vec<_>>(),
            vec![EnvironmentPath::prod(), exp("exp1"), exp("exp2"), test_t1]
        );
    }

    #[test]
    fn groups_need_an_override_file_somewhere_below() {
        let groups = list_active_groups(&store(), Path::new("ov"), &exp("exp1")).unwrap();
        assert_eq!(groups.into_iter().collect::<Vec<_>>(), vec!["groupA", "groupB"]);

        let test_t1 = EnvironmentPath::with_experiment(EnvKind::Test, "t1").unwrap();
        assert!(list_active_groups(&store(), Path::new("ov"), &test_t1).unwrap().is_empty());
    }

    #[test]
    fn scan_builds_snapshot() {
        let topology = OverrideTopology::scan(&store(), Path::new("ov")).unwrap();
        assert_eq!(topology.environment_paths().count(), 4);
        assert_eq!(topology.active_groups(&EnvironmentPath::prod()).collect::<Vec<_>>(), vec![
            "groupA"
        ]);
        assert_eq!(topology.active_groups(&exp("missing")).count(), 0);
    }

    #[test]
    fn missing_root_is_empty() {
        let topology = OverrideTopology::scan(&MemoryFilesystem::new(), Path::new("ov")).unwrap();
        assert_eq!(topology.environment_paths().count(), 0);
    }

    #[test]
    fn override_file_mirrors_job_path() {
        assert_eq!(
            override_file(Path::new("ov"), &exp("exp1"), "groupB", "deep/job2"),
            PathBuf::from("ov/experiment/exp1/groupB/deep/job2/config.yml")
        );
        assert_eq!(
            override_file(Path::new("ov"), &EnvironmentPath::prod(), "groupA", "job1"),
            PathBuf::from("ov/prod/groupA/job1/config.yml")
        );
    }
}
