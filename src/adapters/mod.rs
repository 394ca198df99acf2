//! Concrete `FileStore` adapters.

mod local_filesystem;
#[cfg(test)]
mod memory_filesystem;

pub use local_filesystem::LocalFilesystem;
#[cfg(test)]
pub(crate) use memory_filesystem::MemoryFilesystem;
