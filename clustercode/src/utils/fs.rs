//! Directory helpers shared by the cleanup stages.
//!
//! These attach the operation and path to failures and keep the
//! create-parent-directory pattern in one place.

use std::path::Path;

use crate::fs::FileSystem;
use crate::{Error, Result};

/// Ensure a directory exists, creating it (recursively) if needed.
pub fn ensure_dir_all_with_op(fs: &dyn FileSystem, op: &'static str, path: &Path) -> Result<()> {
    fs.create_dir_all(path).map_err(|e| Error::write(op, path, e))
}

/// Ensure the parent directory of a file path exists.
pub fn ensure_parent_dir(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    ensure_dir_all_with_op(fs, "creating directory", parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    #[test]
    fn test_ensure_parent_dir() {
        let fs = MemoryFileSystem::new();
        ensure_parent_dir(&fs, Path::new("/out/a/b/file.mkv")).unwrap();
        assert!(fs.is_dir("/out/a/b"));
        assert!(!fs.exists(Path::new("/out/a/b/file.mkv")));

        // relative file name without a directory part
        ensure_parent_dir(&fs, Path::new("file.mkv")).unwrap();
    }

    #[test]
    fn test_ensure_dir_reports_operation() {
        let fs = MemoryFileSystem::new();
        fs.deny("/out");
        let err = ensure_dir_all_with_op(&fs, "creating output directory", Path::new("/out/x"))
            .unwrap_err();
        assert!(err.to_string().contains("creating output directory"));
        assert!(matches!(err, Error::Write { .. }));
    }
}
