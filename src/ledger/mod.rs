//! Ledger module containing the month window and the transfer ledger itself

pub mod core;
pub mod window;

pub use core::*;
pub use window::*;
