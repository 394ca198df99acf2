use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::AppError;
use crate::ports::{DirEntry, EntryKind, FileStore};

/// In-memory file store for testing.
///
/// Directories exist implicitly as ancestors of files, or explicitly via
/// [`MemoryFilesystem::create_dir`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.files.lock().unwrap().insert(path.as_ref().to_path_buf(), content.to_string());
        self
    }

    pub fn create_dir(&self, path: impl AsRef<Path>) {
        self.dirs.lock().unwrap().insert(path.as_ref().to_path_buf());
    }

    /// All stored file paths.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    fn known_paths(&self) -> Vec<(PathBuf, EntryKind)> {
        let files = self.files.lock().unwrap();
        let dirs = self.dirs.lock().unwrap();
        files
            .keys()
            .map(|p| (p.clone(), EntryKind::File))
            .chain(dirs.iter().map(|p| (p.clone(), EntryKind::Dir)))
            .collect()
    }
}

fn not_found(path: &Path) -> AppError {
    AppError::io(path, io::Error::new(io::ErrorKind::NotFound, "not found"))
}

impl FileStore for MemoryFilesystem {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, AppError> {
        if !self.is_dir(path) {
            return Err(not_found(path));
        }

        let mut children: BTreeMap<String, EntryKind> = BTreeMap::new();
        for (known, kind) in self.known_paths() {
            let Ok(rest) = known.strip_prefix(path) else { continue };
            let mut components = rest.components();
            let Some(first) = components.next() else { continue };
            let name = first.as_os_str().to_string_lossy().to_string();
            let child_kind = if components.next().is_some() { EntryKind::Dir } else { kind };
            children.entry(name).or_insert(child_kind);
        }

        Ok(children
            .into_iter()
            .map(|(name, kind)| DirEntry { path: path.join(&name), name, kind })
            .collect())
    }

    fn read_file(&self, path: &Path) -> Result<String, AppError> {
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        self.files.lock().unwrap().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let is_file = self.files.lock().unwrap().contains_key(path);
        is_file || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.known_paths().iter().any(|(known, kind)| {
            (*kind == EntryKind::Dir && known == path)
                || (known != path && known.starts_with(path))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_implicit_directories() {
        let store = MemoryFilesystem::new()
            .with_file("root/prod/groupA/job1/config.yml", "a: 1")
            .with_file("root/readme.md", "");
        store.create_dir("root/test");

        let entries = store.list_dir(Path::new("root")).unwrap();
        let listed: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
        assert_eq!(
            listed,
            vec![("prod", EntryKind::Dir), ("readme.md", EntryKind::File), ("test", EntryKind::Dir)]
        );
        assert!(store.is_dir(Path::new("root/prod/groupA")));
        assert!(!store.is_dir(Path::new("root/readme.md")));
        assert!(store.list_dir(Path::new("missing")).is_err());
    }
}
