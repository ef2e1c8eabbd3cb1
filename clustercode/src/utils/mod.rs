pub mod clock;
pub mod filename;
pub mod fs;
