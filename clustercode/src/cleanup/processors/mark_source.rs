//! Writes the completion marker next to the source so later scans skip it.

use std::path::PathBuf;
use std::sync::Arc;

use pipeline_common::{BoxError, Processor};
use tracing::{debug, info};

use crate::cleanup::CleanupContext;
use crate::fs::FileSystem;
use crate::scan::marker_path;
use crate::{Error, Result};

pub struct MarkSourceProcessor {
    fs: Arc<dyn FileSystem>,
    base_input_dir: PathBuf,
    skip_extension: String,
}

impl MarkSourceProcessor {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        base_input_dir: impl Into<PathBuf>,
        skip_extension: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            base_input_dir: base_input_dir.into(),
            skip_extension: skip_extension.into(),
        }
    }

    fn process_step(&self, context: CleanupContext) -> Result<CleanupContext> {
        if context.is_failed() {
            debug!("Transcode failed, not marking source as done");
            return Ok(context);
        }

        let source = self
            .base_input_dir
            .join(context.event.media.relative_path());
        let marker = marker_path(&source, &self.skip_extension);
        self.fs
            .create_file(&marker)
            .map_err(|e| Error::write("creating completion marker", &marker, e))?;

        info!(marker = %marker.display(), "Marked source as done");
        Ok(context)
    }
}

impl Processor<CleanupContext> for MarkSourceProcessor {
    fn process(&self, context: CleanupContext) -> std::result::Result<CleanupContext, BoxError> {
        Ok(self.process_step(context)?)
    }

    fn name(&self) -> &'static str {
        "MarkSourceProcessor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaCandidate, TranscodeFinishedEvent};
    use crate::fs::MemoryFileSystem;
    use std::path::Path;

    fn context(successful: bool) -> CleanupContext {
        let media = MediaCandidate::new("1/sub/a.mp4", 1).unwrap();
        CleanupContext::new(TranscodeFinishedEvent::new(media, "/tmp/a.mkv", successful))
    }

    #[test]
    fn test_creates_marker() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/in/1/sub/a.mp4", "src");

        let ctx = MarkSourceProcessor::new(fs.clone(), "/in", ".done")
            .process(context(true))
            .unwrap();

        assert!(fs.exists(Path::new("/in/1/sub/a.mp4.done")));
        assert!(fs.exists(Path::new("/in/1/sub/a.mp4")));
        assert!(ctx.output_path().is_none());
    }

    #[test]
    fn test_failed_event_not_marked() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/in/1/sub/a.mp4", "src");

        MarkSourceProcessor::new(fs.clone(), "/in", ".done")
            .process(context(false))
            .unwrap();

        assert!(!fs.exists(Path::new("/in/1/sub/a.mp4.done")));
    }

    #[test]
    fn test_missing_lane_directory_fails() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_dir("/in");

        let result = MarkSourceProcessor::new(fs.clone(), "/in", ".done").process(context(true));
        assert!(result.is_err());
    }
}
