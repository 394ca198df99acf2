//! Filesystem capability used by the engine.
//!
//! The engine never touches `std::fs` directly; discovery, override loading
//! and artifact writes all go through this port.

use std::path::{Path, PathBuf};

use crate::domain::AppError;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A single directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Port for the file operations the generator needs.
pub trait FileStore {
    /// List immediate entries of a directory, sorted by name.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, AppError>;

    /// Read a file as UTF-8 text.
    fn read_file(&self, path: &Path) -> Result<String, AppError>;

    /// Write UTF-8 content to a file, creating parent directories as needed.
    fn write_file(&self, path: &Path, content: &str) -> Result<(), AppError>;

    /// Check whether a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check whether a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a file, mapping absence to `None`.
    fn read_optional(&self, path: &Path) -> Result<Option<String>, AppError> {
        match self.read_file(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
