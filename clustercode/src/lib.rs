//! clustercode worker core.
//!
//! Discovers transcode candidates in a priority-partitioned input tree and
//! moves finished transcodes into the output tree.

pub mod cleanup;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs;
pub mod logging;
pub mod scan;
pub mod utils;

pub use error::{Error, Result};
