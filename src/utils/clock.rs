//! Clock implementations

use chrono::{Duration, NaiveDateTime};
use std::sync::{Arc, RwLock};

use crate::traits::Clock;

/// Wall clock in the machine's local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Manually driven clock for testing and demos
///
/// Clones share the same instant, so a test can keep one handle and move time forward
/// while the ledger holds another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<NaiveDateTime>>,
}

impl FixedClock {
    /// Create a clock pinned at `now`
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Move the clock to `now`
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.write().unwrap() = now;
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fixed_clock_clones_share_time() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let clock = FixedClock::new(start);
        let other = clock.clone();

        clock.advance(Duration::days(1));
        assert_eq!(other.now(), start + Duration::days(1));

        other.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second >= first);
    }
}
