use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::MediaCandidate;

/// Emitted by the transcoding engine once a job has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeFinishedEvent {
    /// The candidate that was transcoded.
    pub media: MediaCandidate,
    /// Absolute path of the produced temporary output file.
    pub temporary_path: PathBuf,
    pub successful: bool,
}

impl TranscodeFinishedEvent {
    pub fn new(media: MediaCandidate, temporary_path: impl Into<PathBuf>, successful: bool) -> Self {
        Self {
            media,
            temporary_path: temporary_path.into(),
            successful,
        }
    }
}
