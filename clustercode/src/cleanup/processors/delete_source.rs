//! Removes the original candidate from the input tree.

use std::path::PathBuf;
use std::sync::Arc;

use pipeline_common::{BoxError, Processor};
use tracing::{debug, info};

use crate::cleanup::CleanupContext;
use crate::fs::FileSystem;
use crate::{Error, Result};

pub struct DeleteSourceProcessor {
    fs: Arc<dyn FileSystem>,
    base_input_dir: PathBuf,
}

impl DeleteSourceProcessor {
    pub fn new(fs: Arc<dyn FileSystem>, base_input_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            base_input_dir: base_input_dir.into(),
        }
    }

    fn process_step(&self, context: CleanupContext) -> Result<CleanupContext> {
        if context.is_failed() {
            debug!("Transcode failed, keeping source");
            return Ok(context);
        }

        let source = self
            .base_input_dir
            .join(context.event.media.relative_path());
        self.fs
            .remove_file(&source)
            .map_err(|e| Error::write("deleting source file", &source, e))?;

        info!(path = %source.display(), "Deleted source file");
        Ok(context)
    }
}

impl Processor<CleanupContext> for DeleteSourceProcessor {
    fn process(&self, context: CleanupContext) -> std::result::Result<CleanupContext, BoxError> {
        Ok(self.process_step(context)?)
    }

    fn name(&self) -> &'static str {
        "DeleteSourceProcessor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaCandidate, TranscodeFinishedEvent};
    use crate::fs::MemoryFileSystem;
    use std::path::Path;

    fn context(successful: bool) -> CleanupContext {
        let media = MediaCandidate::new("0/a.mp4", 0).unwrap();
        CleanupContext::new(TranscodeFinishedEvent::new(media, "/tmp/a.mkv", successful))
    }

    #[test]
    fn test_deletes_source() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/in/0/a.mp4", "src");

        DeleteSourceProcessor::new(fs.clone(), "/in")
            .process(context(true))
            .unwrap();

        assert!(!fs.exists(Path::new("/in/0/a.mp4")));
        assert!(fs.is_dir("/in/0"));
    }

    #[test]
    fn test_failed_event_keeps_source() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/in/0/a.mp4", "src");

        DeleteSourceProcessor::new(fs.clone(), "/in")
            .process(context(false))
            .unwrap();

        assert!(fs.exists(Path::new("/in/0/a.mp4")));
    }

    #[test]
    fn test_missing_source_is_error() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_dir("/in/0");

        let err = DeleteSourceProcessor::new(fs.clone(), "/in")
            .process(context(true))
            .unwrap_err();
        assert!(err.to_string().contains("deleting source file"));
    }
}
