//! In-memory [`FileSystem`] used by unit tests.

use std::collections::BTreeMap;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::{EntryKind, FileSystem, FsEntry};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<PathBuf, Node>,
    denied: Vec<PathBuf>,
}

impl State {
    fn check(&self, path: &Path) -> io::Result<()> {
        if self.denied.iter().any(|d| path.starts_with(d)) {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn require_parent_dir(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.is_dir(parent) => Err(
                not_found(parent),
            ),
            _ => Ok(()),
        }
    }

    fn insert_dirs(&mut self, path: &Path) -> io::Result<()> {
        let mut missing = Vec::new();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            match self.nodes.get(ancestor) {
                Some(Node::Dir) => break,
                Some(Node::File(_)) => {
                    return Err(io::Error::new(
                        ErrorKind::NotADirectory,
                        format!("not a directory: {}", ancestor.display()),
                    ));
                }
                None => missing.push(ancestor.to_path_buf()),
            }
        }
        for dir in missing {
            self.nodes.insert(dir, Node::Dir);
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

/// Thread-safe in-memory filesystem.
///
/// Parent directories are created implicitly by [`add_file`](Self::add_file)
/// and [`add_dir`](Self::add_dir). [`deny`](Self::deny) makes every
/// operation on a path (or below it) fail with `PermissionDenied`.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: RwLock<State>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory and all missing parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        let _ = self.state.write().insert_dirs(path.as_ref());
        self
    }

    /// Add a file with the given contents, creating parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> &Self {
        let path = path.as_ref();
        let mut state = self.state.write();
        if let Some(parent) = path.parent() {
            let _ = state.insert_dirs(parent);
        }
        state
            .nodes
            .insert(path.to_path_buf(), Node::File(contents.into()));
        drop(state);
        self
    }

    /// Contents of a file, `None` if absent or a directory.
    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.state.read().nodes.get(path.as_ref()) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state.read().is_dir(path.as_ref())
    }

    /// Make every operation touching `path` or its descendants fail.
    pub fn deny(&self, path: impl AsRef<Path>) -> &Self {
        self.state.write().denied.push(path.as_ref().to_path_buf());
        self
    }

    /// Every file path currently stored, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.state
            .read()
            .nodes
            .iter()
            .filter(|(_, node)| matches!(node, Node::File(_)))
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let state = self.state.read();
        state.check(path)?;
        match state.nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => {
                return Err(io::Error::new(
                    ErrorKind::NotADirectory,
                    format!("not a directory: {}", path.display()),
                ));
            }
            None => return Err(not_found(path)),
        }

        Ok(state
            .nodes
            .iter()
            .filter(|(child, _)| child.parent() == Some(path))
            .map(|(child, node)| FsEntry {
                path: child.clone(),
                kind: match node {
                    Node::Dir => EntryKind::Dir,
                    Node::File(_) => EntryKind::File,
                },
            })
            .collect())
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.read();
        state.check(root)?;
        if !state.is_dir(root) {
            return Err(not_found(root));
        }

        let mut files = Vec::new();
        for (path, node) in state.nodes.iter() {
            if path == root || !path.starts_with(root) {
                continue;
            }
            state.check(path)?;
            if let Node::File(_) = node {
                files.push(path.clone());
            }
        }
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        self.state.read().nodes.contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write();
        state.check(path)?;
        state.insert_dirs(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.write();
        state.check(from)?;
        state.check(to)?;
        state.require_parent_dir(to)?;
        match state.nodes.get(to) {
            Some(Node::Dir) => {
                return Err(io::Error::new(
                    ErrorKind::IsADirectory,
                    format!("is a directory: {}", to.display()),
                ));
            }
            Some(Node::File(_)) | None => {}
        }
        match state.nodes.remove(from) {
            Some(Node::File(contents)) => {
                state.nodes.insert(to.to_path_buf(), Node::File(contents));
                Ok(())
            }
            Some(Node::Dir) => {
                state.nodes.insert(from.to_path_buf(), Node::Dir);
                Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("moving directories is not supported: {}", from.display()),
                ))
            }
            None => Err(not_found(from)),
        }
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write();
        state.check(path)?;
        state.require_parent_dir(path)?;
        if state.is_dir(path) {
            return Err(io::Error::new(
                ErrorKind::IsADirectory,
                format!("is a directory: {}", path.display()),
            ));
        }
        state.nodes.insert(path.to_path_buf(), Node::File(Vec::new()));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.write();
        state.check(path)?;
        match state.nodes.get(path) {
            Some(Node::File(_)) => {
                state.nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(io::Error::new(
                ErrorKind::IsADirectory,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }
}
