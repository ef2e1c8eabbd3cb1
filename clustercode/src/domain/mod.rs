//! Value types shared by the scanner and the cleanup pipeline.

mod candidate;
mod event;

pub use candidate::{MediaCandidate, PriorityLane};
pub use event::TranscodeFinishedEvent;
