//! `FileStore` implementation backed by the host filesystem.

use std::fs;
use std::path::Path;

use crate::domain::AppError;
use crate::ports::{DirEntry, EntryKind, FileStore};

/// Host filesystem. Paths are used as given (absolute or relative to the
/// process working directory).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFilesystem {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, AppError> {
        let entries = fs::read_dir(path).map_err(|e| AppError::io(path, e))?;
        let mut listed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::io(path, e))?;
            let entry_path = entry.path();
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| AppError::NonUtf8Path(entry_path.clone()))?;
            let kind = if entry_path.is_dir() { EntryKind::Dir } else { EntryKind::File };
            listed.push(DirEntry { name, path: entry_path, kind });
        }
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }

    fn read_file(&self, path: &Path) -> Result<String, AppError> {
        fs::read_to_string(path).map_err(|e| AppError::io(path, e))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| AppError::io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
