//! Utility modules

pub mod clock;
pub mod format;

pub use clock::*;
pub use format::*;
