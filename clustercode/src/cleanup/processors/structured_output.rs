//! Structured output processor.
//!
//! Recreates the candidate's directory tree, minus the priority lane, under
//! the configured output root and moves the transcoded file there.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pipeline_common::{BoxError, Processor};
use tracing::debug;

use crate::cleanup::{CleanupContext, FileRelocator};
use crate::domain::MediaCandidate;
use crate::fs::FileSystem;
use crate::utils::fs::{ensure_dir_all_with_op, ensure_parent_dir};
use crate::{Error, Result};

/// Mirrors `<lane>/sub/dir/file` to `<output>/sub/dir/<temporary file name>`.
pub struct StructuredOutputProcessor {
    fs: Arc<dyn FileSystem>,
    relocator: FileRelocator,
    base_output_dir: PathBuf,
    overwrite: bool,
}

impl StructuredOutputProcessor {
    /// Create the processor, creating the output root if it does not exist yet.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        relocator: FileRelocator,
        base_output_dir: impl Into<PathBuf>,
        overwrite: bool,
    ) -> Result<Self> {
        let base_output_dir = base_output_dir.into();
        ensure_dir_all_with_op(fs.as_ref(), "creating output directory", &base_output_dir)?;
        Ok(Self {
            fs,
            relocator,
            base_output_dir,
            overwrite,
        })
    }

    /// Resolve the candidate under the output root and create its parent directories.
    ///
    /// For `0/subdir/file.ext` and output root `output` this returns
    /// `output/subdir/file.ext` with `output/subdir` created. The file itself
    /// is never created.
    pub fn create_output_directory_tree(&self, media: &MediaCandidate) -> Result<PathBuf> {
        let target = self.base_output_dir.join(media.path_without_priority());
        ensure_parent_dir(self.fs.as_ref(), &target)?;
        Ok(target)
    }

    fn process_step(&self, mut context: CleanupContext) -> Result<CleanupContext> {
        if context.is_failed() {
            debug!("Transcode failed, skipping structured output");
            return Ok(context);
        }

        let source = context.event.temporary_path.clone();
        let target = self.create_output_directory_tree(&context.event.media)?;

        let file_name = source.file_name().ok_or_else(|| {
            Error::validation(format!(
                "temporary path {} has no file name",
                source.display()
            ))
        })?;
        let target_dir = target.parent().unwrap_or(Path::new(""));
        let final_path = target_dir.join(file_name);
        ensure_parent_dir(self.fs.as_ref(), &final_path)?;

        let output = self.relocator.relocate(&source, &final_path, self.overwrite)?;
        context.output_path = Some(output);
        Ok(context)
    }
}

impl Processor<CleanupContext> for StructuredOutputProcessor {
    fn process(&self, context: CleanupContext) -> std::result::Result<CleanupContext, BoxError> {
        Ok(self.process_step(context)?)
    }

    fn name(&self) -> &'static str {
        "StructuredOutputProcessor"
    }
}
