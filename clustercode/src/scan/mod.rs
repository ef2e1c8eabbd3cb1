//! Discovery of transcode candidates in the priority-partitioned input tree.

mod report;
mod scanner;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use report::{LaneReport, ScanReport};
pub use scanner::PriorityScanner;

use crate::Result;
use crate::domain::{MediaCandidate, PriorityLane};

/// Candidates grouped by lane. Lanes without eligible files map to an empty list.
pub type CandidateMap = BTreeMap<PriorityLane, Vec<MediaCandidate>>;

/// Source of transcode candidates.
pub trait ScanService: Send + Sync {
    /// Walk the input tree and return every lane with its eligible candidates.
    ///
    /// Blocks until the tree has been scanned. Fails as a whole if the input
    /// root or any lane cannot be read.
    fn retrieve_files(&self) -> Result<CandidateMap>;
}

/// Path of the completion marker for `path`, i.e. `path` with `suffix` appended.
pub fn marker_path(path: &Path, suffix: &str) -> PathBuf {
    let mut marker = OsString::from(path.as_os_str());
    marker.push(suffix);
    PathBuf::from(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_path_appends_suffix() {
        assert_eq!(
            marker_path(Path::new("/in/1/b.mp4"), ".done"),
            PathBuf::from("/in/1/b.mp4.done")
        );
    }
}
