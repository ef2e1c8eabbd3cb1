use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{EntryKind, FileSystem, FsEntry};

/// [`FileSystem`] backed by the real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let path = entry?.path();
            // Follow symlinks, shares often link lanes in from elsewhere.
            let kind = match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => EntryKind::Dir,
                Ok(meta) if meta.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            };
            entries.push(FsEntry { path, kind });
        }
        Ok(entries)
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_broken_link(&e) => {
                    debug!(path = ?e.path(), error = %e, "Skipping broken symlink");
                    continue;
                }
                Err(e) => return Err(io::Error::from(e)),
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        fs::File::create(path).map(|_| ())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Dangling links and link loops are not files; anything else is a real read error.
fn is_broken_link(err: &walkdir::Error) -> bool {
    if err.loop_ancestor().is_some() {
        return true;
    }
    let not_found = err
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
    not_found
        && err
            .path()
            .and_then(|p| fs::symlink_metadata(p).ok())
            .is_some_and(|meta| meta.file_type().is_symlink())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_kinds() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("1")).unwrap();
        fs::write(temp_dir.path().join("stray.txt"), "x").unwrap();

        let fs = OsFileSystem::new();
        let mut entries = fs.read_dir(temp_dir.path()).unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name(), Some("1"));
        assert!(entries[0].is_dir());
        assert_eq!(entries[1].kind, EntryKind::File);
    }

    #[test]
    fn test_walk_files_recurses() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deep.mp4"), "x").unwrap();
        fs::write(temp_dir.path().join("top.mp4"), "x").unwrap();

        let files = OsFileSystem::new().walk_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&nested.join("deep.mp4")));
    }

    #[test]
    fn test_create_dir_all_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("x/y");
        let fs = OsFileSystem::new();
        fs.create_dir_all(&dir).unwrap();
        fs.create_dir_all(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_files_skips_dangling_symlink() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mp4"), "x").unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", temp_dir.path().join("stale-link"))
            .unwrap();

        let files = OsFileSystem::new().walk_files(temp_dir.path()).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("a.mp4")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_files_skips_symlink_loop() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("a.mp4"), "x").unwrap();
        std::os::unix::fs::symlink(temp_dir.path(), sub.join("back")).unwrap();

        let files = OsFileSystem::new().walk_files(temp_dir.path()).unwrap();
        assert_eq!(files, vec![sub.join("a.mp4")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_files_unreadable_dir_still_fails() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // root ignores directory permissions
        let readable = fs::read_dir(&locked).is_ok();

        let result = OsFileSystem::new().walk_files(temp_dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
        }
    }

    #[test]
    fn test_read_dir_missing_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = OsFileSystem::new().read_dir(&temp_dir.path().join("missing"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
