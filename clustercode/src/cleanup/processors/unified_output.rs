//! Unified output processor: moves every result flat into the output root.

use std::path::PathBuf;
use std::sync::Arc;

use pipeline_common::{BoxError, Processor};
use tracing::debug;

use crate::cleanup::{CleanupContext, FileRelocator};
use crate::fs::FileSystem;
use crate::utils::fs::ensure_dir_all_with_op;
use crate::{Error, Result};

pub struct UnifiedOutputProcessor {
    fs: Arc<dyn FileSystem>,
    relocator: FileRelocator,
    base_output_dir: PathBuf,
    overwrite: bool,
}

impl UnifiedOutputProcessor {
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

    fn process_step(&self, mut context: CleanupContext) -> Result<CleanupContext> {
        if context.is_failed() {
            debug!("Transcode failed, skipping unified output");
            return Ok(context);
        }

        let source = context.event.temporary_path.clone();
        let file_name = source.file_name().ok_or_else(|| {
            Error::validation(format!(
                "temporary path {} has no file name",
                source.display()
            ))
        })?;
        let destination = self.base_output_dir.join(file_name);
        // the root may have been removed since construction
        ensure_dir_all_with_op(self.fs.as_ref(), "creating output directory", &self.base_output_dir)?;

        let output = self.relocator.relocate(&source, &destination, self.overwrite)?;
        context.output_path = Some(output);
        Ok(context)
    }
}

impl Processor<CleanupContext> for UnifiedOutputProcessor {
    fn process(&self, context: CleanupContext) -> std::result::Result<CleanupContext, BoxError> {
        Ok(self.process_step(context)?)
    }

    fn name(&self) -> &'static str {
        "UnifiedOutputProcessor"
    }
}
