//! Moving finished files into place without clobbering existing ones.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::utils::clock::Clock;
use crate::utils::filename::timestamped_path;
use crate::{Error, Result};

/// Moves files, optionally diverting to a timestamped name instead of overwriting.
#[derive(Clone)]
pub struct FileRelocator {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
}

impl FileRelocator {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>) -> Self {
        Self { fs, clock }
    }

    /// Move `source` to `destination` and return where it ended up.
    ///
    /// With `overwrite` an existing destination is replaced. Without it, an
    /// existing destination is left alone and the file goes to
    /// `<stem>.<timestamp>.<ext>` in the same directory instead. The
    /// timestamp has second granularity; if that alternate is taken too the
    /// move fails with `AlreadyExists` and the source stays where it is.
    pub fn relocate(&self, source: &Path, destination: &Path, overwrite: bool) -> Result<PathBuf> {
        let target = if overwrite || !self.fs.exists(destination) {
            destination.to_path_buf()
        } else {
            let alternate = timestamped_path(destination, self.clock.now());
            debug!(
                existing = %destination.display(),
                alternate = %alternate.display(),
                "Destination exists, using alternate name"
            );
            if self.fs.exists(&alternate) {
                warn!(path = %alternate.display(), "Alternate file name already taken");
                return Err(Error::write(
                    "moving file to",
                    &alternate,
                    io::Error::new(io::ErrorKind::AlreadyExists, "alternate file already exists"),
                ));
            }
            alternate
        };

        self.fs
            .rename(source, &target)
            .map_err(|e| Error::write("moving file to", &target, e))?;

        info!(
            source = %source.display(),
            destination = %target.display(),
            "Moved file"
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::utils::clock::FixedClock;

    fn relocator(fs: &Arc<MemoryFileSystem>) -> FileRelocator {
        FileRelocator::new(fs.clone(), Arc::new(FixedClock::at(2024, 3, 9, 14, 5, 7)))
    }

    #[test]
    fn test_moves_when_destination_free() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/tmp/a.mkv", "new").add_dir("/out");

        let out = relocator(&fs)
            .relocate(Path::new("/tmp/a.mkv"), Path::new("/out/a.mkv"), false)
            .unwrap();

        assert_eq!(out, PathBuf::from("/out/a.mkv"));
        assert_eq!(fs.read("/out/a.mkv").unwrap(), b"new");
        assert!(!fs.exists(Path::new("/tmp/a.mkv")));
    }

    #[test]
    fn test_keeps_existing_without_overwrite() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/tmp/a.mkv", "new").add_file("/out/a.mkv", "old");

        let out = relocator(&fs)
            .relocate(Path::new("/tmp/a.mkv"), Path::new("/out/a.mkv"), false)
            .unwrap();

        assert_eq!(out, PathBuf::from("/out/a.20240309-140507.mkv"));
        assert_eq!(fs.read("/out/a.mkv").unwrap(), b"old");
        assert_eq!(fs.read(&out).unwrap(), b"new");
    }

    #[test]
    fn test_taken_alternate_is_not_replaced() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/tmp/a.mkv", "third")
            .add_file("/out/a.mkv", "first")
            .add_file("/out/a.20240309-140507.mkv", "second");

        let err = relocator(&fs)
            .relocate(Path::new("/tmp/a.mkv"), Path::new("/out/a.mkv"), false)
            .unwrap_err();

        match err {
            Error::Write { path, source, .. } => {
                assert_eq!(path, PathBuf::from("/out/a.20240309-140507.mkv"));
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs.read("/out/a.mkv").unwrap(), b"first");
        assert_eq!(fs.read("/out/a.20240309-140507.mkv").unwrap(), b"second");
        assert_eq!(fs.read("/tmp/a.mkv").unwrap(), b"third");
    }

    #[test]
    fn test_replaces_existing_with_overwrite() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/tmp/a.mkv", "new").add_file("/out/a.mkv", "old");

        let out = relocator(&fs)
            .relocate(Path::new("/tmp/a.mkv"), Path::new("/out/a.mkv"), true)
            .unwrap();

        assert_eq!(out, PathBuf::from("/out/a.mkv"));
        assert_eq!(fs.read("/out/a.mkv").unwrap(), b"new");
        assert_eq!(fs.files(), vec![PathBuf::from("/out/a.mkv")]);
    }

    #[test]
    fn test_move_failure_is_write_error() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/tmp/a.mkv", "new").add_dir("/out").deny("/out");

        let err = relocator(&fs)
            .relocate(Path::new("/tmp/a.mkv"), Path::new("/out/a.mkv"), false)
            .unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        assert_eq!(fs.read("/tmp/a.mkv").unwrap(), b"new");
    }
}
