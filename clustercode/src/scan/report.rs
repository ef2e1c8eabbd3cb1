use std::path::PathBuf;

use serde::Serialize;

use super::CandidateMap;

/// Serializable view of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub lanes: Vec<LaneReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaneReport {
    pub priority: u32,
    pub path: PathBuf,
    /// Candidate paths relative to the input root.
    pub candidates: Vec<PathBuf>,
}

impl ScanReport {
    pub fn candidate_count(&self) -> usize {
        self.lanes.iter().map(|l| l.candidates.len()).sum()
    }
}

impl From<&CandidateMap> for ScanReport {
    fn from(map: &CandidateMap) -> Self {
        let lanes = map
            .iter()
            .map(|(lane, candidates)| LaneReport {
                priority: lane.priority(),
                path: lane.path().to_path_buf(),
                candidates: candidates
                    .iter()
                    .map(|c| c.relative_path().to_path_buf())
                    .collect(),
            })
            .collect();
        Self { lanes }
    }
}
