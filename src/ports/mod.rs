mod file_store;

pub use file_store::{DirEntry, EntryKind, FileStore};
