//! Cleanup stages run after a transcode finished.
//!
//! Every stage leaves the context untouched when the transcode failed.

mod delete_source;
mod mark_source;
mod structured_output;
mod unified_output;

pub use delete_source::DeleteSourceProcessor;
pub use mark_source::MarkSourceProcessor;
pub use structured_output::StructuredOutputProcessor;
pub use unified_output::UnifiedOutputProcessor;
