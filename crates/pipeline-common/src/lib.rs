//! # Pipeline Common
//!
//! This crate provides the processor-chain abstraction used by the cleanup
//! stage of the transcoding workers. A pipeline owns an ordered list of named
//! stages and threads a single context value through them.
//!
//! ## Features
//!
//! - Generic `Processor<C>` trait for a stage that consumes and returns a context
//! - Closure stages via [`FnProcessor`]
//! - Generic `Pipeline<C>` that runs stages in declared order
//!

use thiserror::Error;

pub mod pipeline;
pub mod processor;

#[cfg(test)]
mod test_utils;

pub use pipeline::Pipeline;
pub use processor::{BoxError, FnProcessor, Processor};

/// Common error type for pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage process failed ({stage}): {source}")]
    StageProcess {
        stage: &'static str,
        #[source]
        source: BoxError,
    },
}

impl PipelineError {
    /// Name of the stage that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::StageProcess { stage, .. } => *stage,
        }
    }
}
