//! Filesystem capability used by the scanner and the cleanup stages.
//!
//! Everything that touches the disk goes through [`FileSystem`], so the
//! scanning and relocation logic can be unit tested against the in-memory
//! `MemoryFileSystem` (tests and the `test-utils` feature) without real I/O.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod os;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// An immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl FsEntry {
    /// Final path component as UTF-8, if it is valid UTF-8.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Blocking filesystem operations.
pub trait FileSystem: Send + Sync {
    /// List the immediate children of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    /// Recursively collect every regular file below `root`.
    ///
    /// Any unreadable directory in the subtree fails the whole walk.
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all missing parents. Existing directories are not an error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Move a file, replacing any existing file at `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create an empty file (or truncate an existing one).
    fn create_file(&self, path: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}
