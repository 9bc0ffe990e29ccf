//! # Remittance Tracker
//!
//! Core state model for tracking whether a recurring monthly remittance (仕送り) has been
//! sent, month by month.
//!
//! ## Features
//!
//! - **Month ledger**: one transfer record per month over a rolling or calendar-year window
//! - **Live status**: each month is Completed, Overdue, or Pending, derived from the clock on read
//! - **Statistics**: completed/overdue/pending counts, completed amount, and completion rate
//! - **Overdue monitor**: optional cancellable task reporting months as they turn overdue
//! - **Display helpers**: ja-JP labels for months, yen amounts, and statuses
//!
//! ## Quick Start
//!
//! ```rust
//! use remittance_tracker::{Ledger, MonthKey, TransferStatus};
//! use remittance_tracker::utils::FixedClock;
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let mut ledger = Ledger::with_defaults(FixedClock::new(now)).unwrap();
//!
//! let may = MonthKey::new(2025, 5).unwrap();
//! assert_eq!(ledger.status(may).unwrap(), TransferStatus::Overdue);
//!
//! ledger.toggle(may).unwrap();
//! assert_eq!(ledger.summary().completed_count, 1);
//! ```

pub mod config;
pub mod ledger;
pub mod monitor;
pub mod observability;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use monitor::*;
pub use traits::*;
pub use types::*;
