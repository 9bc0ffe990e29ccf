//! Traits for the tracker's external inputs and outputs

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::types::*;

/// Source of the current wall-clock time
///
/// The ledger never reads the system clock directly; every status evaluation and every
/// completion timestamp goes through this trait so the time can be pinned in tests.
pub trait Clock: Send + Sync {
    /// The current local instant
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Receiver for months that have just become overdue
///
/// The overdue monitor calls this once per Pending -> Overdue transition. Implementations
/// might forward to a messaging service; the crate itself only ships a logging notifier.
#[async_trait]
pub trait OverdueNotifier: Send + Sync {
    /// Called for each record that became overdue since the previous check
    async fn notify_overdue(&self, record: &TransferRecord) -> LedgerResult<()>;
}
