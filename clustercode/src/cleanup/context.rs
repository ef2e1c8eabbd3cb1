use std::path::{Path, PathBuf};

use crate::domain::TranscodeFinishedEvent;

/// Per-event state threaded through the cleanup pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupContext {
    pub event: TranscodeFinishedEvent,
    /// Final location of the transcoded file, set by an output stage.
    pub output_path: Option<PathBuf>,
}

impl CleanupContext {
    pub fn new(event: TranscodeFinishedEvent) -> Self {
        Self {
            event,
            output_path: None,
        }
    }

    /// Whether the transcode failed. Stages must leave failed contexts untouched.
    pub fn is_failed(&self) -> bool {
        !self.event.successful
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }
}
