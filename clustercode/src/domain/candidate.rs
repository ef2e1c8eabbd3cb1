//! Priority lanes and the media candidates found inside them.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A priority-numbered top-level directory of the input root.
///
/// Lanes order by priority first, then by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PriorityLane {
    priority: u32,
    path: PathBuf,
}

impl PriorityLane {
    /// Build a lane from a directory name, if the name is a non-negative integer.
    ///
    /// Only plain ASCII digits are accepted, so `+1`, `-1` or `1a` are not lanes.
    /// Names that do not fit into `u32` are not lanes either.
    pub fn parse(dir_name: &str, path: impl Into<PathBuf>) -> Option<Self> {
        if dir_name.is_empty() || !dir_name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let priority = dir_name.parse::<u32>().ok()?;
        Some(Self {
            priority,
            path: path.into(),
        })
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Absolute path of the lane directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A file eligible for transcoding.
///
/// The relative path is relative to the input root and always starts with
/// the lane segment, e.g. `0/subdir/file.mp4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CandidateRepr")]
pub struct MediaCandidate {
    relative_path: PathBuf,
    priority: u32,
}

#[derive(Deserialize)]
struct CandidateRepr {
    relative_path: PathBuf,
    priority: u32,
}

impl TryFrom<CandidateRepr> for MediaCandidate {
    type Error = Error;

    fn try_from(repr: CandidateRepr) -> Result<Self> {
        Self::new(repr.relative_path, repr.priority)
    }
}

impl MediaCandidate {
    /// Create a candidate, rejecting paths without room for a lane prefix.
    ///
    /// The path must be relative, contain no `..` and have at least two
    /// segments (the lane plus a file name).
    pub fn new(relative_path: impl Into<PathBuf>, priority: u32) -> Result<Self> {
        let relative_path = relative_path.into();

        let mut segments = 0usize;
        for component in relative_path.components() {
            match component {
                Component::Normal(_) => segments += 1,
                Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidCandidatePath(format!(
                        "{} is not a plain relative path",
                        relative_path.display()
                    )));
                }
            }
        }
        if segments < 2 {
            return Err(Error::InvalidCandidatePath(format!(
                "{} has no lane prefix to strip",
                relative_path.display()
            )));
        }

        Ok(Self {
            relative_path,
            priority,
        })
    }

    /// Path relative to the input root, including the lane segment.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// The relative path with its leading lane segment removed.
    pub fn path_without_priority(&self) -> PathBuf {
        self.relative_path
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .skip(1)
            .collect()
    }
}
