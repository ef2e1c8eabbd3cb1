//! # Processor
//!
//! A processor is one stage of a [`Pipeline`](crate::Pipeline). It takes the
//! context by value and hands it back, possibly modified, or fails.

/// Error type returned by stages.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single pipeline stage.
pub trait Processor<C>: Send + Sync {
    /// Process the context and return it for the next stage.
    fn process(&self, context: C) -> Result<C, BoxError>;

    /// Get the processor name, used in logs and errors.
    fn name(&self) -> &'static str;
}

/// Adapter turning a closure into a named [`Processor`].
pub struct FnProcessor<F> {
    name: &'static str,
    f: F,
}

impl<F> FnProcessor<F> {
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<C, F> Processor<C> for FnProcessor<F>
where
    F: Fn(C) -> Result<C, BoxError> + Send + Sync,
{
    fn process(&self, context: C) -> Result<C, BoxError> {
        (self.f)(context)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<C, P> Processor<C> for Box<P>
where
    P: Processor<C> + ?Sized,
{
    fn process(&self, context: C) -> Result<C, BoxError> {
        (**self).process(context)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
