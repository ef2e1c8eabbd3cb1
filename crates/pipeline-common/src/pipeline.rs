//! # Generic Pipeline Implementation
//!
//! This module provides a generic pipeline implementation that chains together
//! processors to form a complete post-processing workflow.
//!
//! ## Usage
//!
//! Create a new `Pipeline<C>` and add processors that implement the `Processor<C>`
//! trait, or plain closures via [`Pipeline::add_stage`]. Then run a context
//! through the pipeline with [`Pipeline::process`].
//!

use tracing::{debug, warn};

use crate::{BoxError, FnProcessor, PipelineError, Processor};

/// A generic pipeline for threading a context through a series of processors.
///
/// The pipeline coordinates a sequence of processors, with each processor
/// receiving the context returned by the previous one in the chain.
pub struct Pipeline<C> {
    processors: Vec<Box<dyn Processor<C>>>,
}

impl<C> Pipeline<C> {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Add a processor to the end of the pipeline.
    ///
    /// Returns self for method chaining.
    pub fn add_processor<P: Processor<C> + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Add a closure stage to the end of the pipeline.
    pub fn add_stage<F>(self, name: &'static str, f: F) -> Self
    where
        F: Fn(C) -> Result<C, BoxError> + Send + Sync + 'static,
        C: 'static,
    {
        self.add_processor(FnProcessor::new(name, f))
    }

    /// Number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Run the context through every stage in declared order.
    ///
    /// The first failing stage aborts the run; later stages are not executed.
    pub fn process(&self, context: C) -> Result<C, PipelineError> {
        self.processors
            .iter()
            .try_fold(context, |context, processor| {
                let stage = processor.name();
                debug!(stage, "Running pipeline stage");
                processor.process(context).map_err(|source| {
                    warn!(stage, error = %source, "Pipeline stage failed");
                    PipelineError::StageProcess { stage, source }
                })
            })
    }
}

impl<C> Default for Pipeline<C> {
    fn default() -> Self {
        Self::new()
    }
}
