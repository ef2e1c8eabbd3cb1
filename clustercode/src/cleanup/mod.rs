//! Post-transcode cleanup.
//!
//! A [`CleanupService`] runs one [`CleanupContext`] per finished transcode
//! through the configured stages, in order. Stages move the result into the
//! output tree and optionally mark or delete the source.

mod context;
pub mod processors;
mod relocator;

use std::sync::Arc;

use pipeline_common::{Pipeline, Processor};
use tracing::info;

pub use context::CleanupContext;
pub use relocator::FileRelocator;

use crate::Result;
use crate::config::{CleanupConfig, CleanupStrategy, ScanConfig};
use crate::domain::TranscodeFinishedEvent;
use crate::fs::FileSystem;
use crate::utils::clock::Clock;
use processors::{
    DeleteSourceProcessor, MarkSourceProcessor, StructuredOutputProcessor, UnifiedOutputProcessor,
};

/// Runs finished-transcode events through the cleanup pipeline.
pub struct CleanupService {
    pipeline: Pipeline<CleanupContext>,
}

impl CleanupService {
    pub fn new(pipeline: Pipeline<CleanupContext>) -> Self {
        Self { pipeline }
    }

    /// Build the pipeline from the configured strategies, in order.
    pub fn from_config(
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        scan: &ScanConfig,
        cleanup: &CleanupConfig,
    ) -> Result<Self> {
        let relocator = FileRelocator::new(fs.clone(), clock);

        let mut pipeline = Pipeline::new();
        for strategy in &cleanup.strategies {
            let processor: Box<dyn Processor<CleanupContext>> = match strategy {
                CleanupStrategy::StructuredOutput => Box::new(StructuredOutputProcessor::new(
                    fs.clone(),
                    relocator.clone(),
                    &cleanup.base_output_dir,
                    cleanup.overwrite_files,
                )?),
                CleanupStrategy::UnifiedOutput => Box::new(UnifiedOutputProcessor::new(
                    fs.clone(),
                    relocator.clone(),
                    &cleanup.base_output_dir,
                    cleanup.overwrite_files,
                )?),
                CleanupStrategy::MarkSource => Box::new(MarkSourceProcessor::new(
                    fs.clone(),
                    &scan.base_input_dir,
                    scan.skip_extension.clone(),
                )),
                CleanupStrategy::DeleteSource => {
                    Box::new(DeleteSourceProcessor::new(fs.clone(), &scan.base_input_dir))
                }
            };
            pipeline = pipeline.add_processor(processor);
        }

        info!(stages = ?pipeline.stage_names(), "Cleanup pipeline ready");
        Ok(Self::new(pipeline))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.pipeline.stage_names()
    }

    /// Run one finished event through every stage and return the final context.
    pub fn process(&self, event: TranscodeFinishedEvent) -> Result<CleanupContext> {
        info!(
            media = %event.media.relative_path().display(),
            successful = event.successful,
            "Cleaning up finished transcode"
        );
        let context = self.pipeline.process(CleanupContext::new(event))?;
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaCandidate;
    use crate::fs::MemoryFileSystem;
    use crate::utils::clock::FixedClock;
    use std::path::{Path, PathBuf};

    fn configs(strategies: Vec<CleanupStrategy>) -> (ScanConfig, CleanupConfig) {
        let scan = ScanConfig {
            base_input_dir: PathBuf::from("/in"),
            ..ScanConfig::default()
        };
        let cleanup = CleanupConfig {
            base_output_dir: PathBuf::from("/out"),
            overwrite_files: false,
            strategies,
        };
        (scan, cleanup)
    }

    fn service(fs: &Arc<MemoryFileSystem>, strategies: Vec<CleanupStrategy>) -> CleanupService {
        let (scan, cleanup) = configs(strategies);
        CleanupService::from_config(
            fs.clone(),
            Arc::new(FixedClock::at(2024, 3, 9, 14, 5, 7)),
            &scan,
            &cleanup,
        )
        .unwrap()
    }

    fn event(successful: bool) -> TranscodeFinishedEvent {
        let media = MediaCandidate::new("0/show/ep.mp4", 0).unwrap();
        TranscodeFinishedEvent::new(media, "/tmp/ep.mkv", successful)
    }

    #[test]
    fn test_builds_stages_in_configured_order() {
        let fs = Arc::new(MemoryFileSystem::new());
        let service = service(
            &fs,
            vec![
                CleanupStrategy::MarkSource,
                CleanupStrategy::StructuredOutput,
                CleanupStrategy::DeleteSource,
            ],
        );
        assert_eq!(
            service.stage_names(),
            vec![
                "MarkSourceProcessor",
                "StructuredOutputProcessor",
                "DeleteSourceProcessor"
            ]
        );
    }

    #[test]
    fn test_full_cleanup() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/in/0/show/ep.mp4", "src")
            .add_file("/tmp/ep.mkv", "out");
        let service = service(
            &fs,
            vec![CleanupStrategy::StructuredOutput, CleanupStrategy::MarkSource],
        );

        let ctx = service.process(event(true)).unwrap();

        assert_eq!(ctx.output_path(), Some(Path::new("/out/show/ep.mkv")));
        assert!(fs.exists(Path::new("/in/0/show/ep.mp4.done")));
    }

    #[test]
    fn test_failed_event_passes_through() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/in/0/show/ep.mp4", "src")
            .add_file("/tmp/ep.mkv", "out");
        let service = service(
            &fs,
            vec![
                CleanupStrategy::StructuredOutput,
                CleanupStrategy::MarkSource,
                CleanupStrategy::DeleteSource,
            ],
        );
        let before = fs.files();

        let ctx = service.process(event(false)).unwrap();

        assert!(ctx.output_path().is_none());
        assert_eq!(fs.files(), before);
    }

    #[test]
    fn test_stage_failure_names_stage() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/tmp/ep.mkv", "out");
        let service = service(
            &fs,
            vec![CleanupStrategy::DeleteSource, CleanupStrategy::StructuredOutput],
        );

        let err = service.process(event(true)).unwrap_err();

        match err {
            crate::Error::Pipeline(e) => assert_eq!(e.stage(), "DeleteSourceProcessor"),
            other => panic!("unexpected error: {other}"),
        }
        // the structured output stage never ran
        assert!(fs.exists(Path::new("/tmp/ep.mkv")));
    }
}
