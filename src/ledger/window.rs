//! Which months a ledger covers

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Default number of past months in a rolling window
pub const DEFAULT_MONTHS_BACK: u32 = 12;
/// Default number of future months in a rolling window
pub const DEFAULT_MONTHS_FORWARD: u32 = 3;
/// Largest accepted `months_back` or `months_forward` (a century)
pub const MAX_WINDOW_MONTHS: u32 = 1200;

/// Shape of the month range a ledger is populated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerWindow {
    /// `months_back` months before the current month through `months_forward` after it
    Rolling {
        months_back: u32,
        months_forward: u32,
    },
    /// January through December of one year
    CalendarYear { year: i32 },
}

impl Default for LedgerWindow {
    fn default() -> Self {
        LedgerWindow::Rolling {
            months_back: DEFAULT_MONTHS_BACK,
            months_forward: DEFAULT_MONTHS_FORWARD,
        }
    }
}

impl LedgerWindow {
    /// Rolling window with the given bounds
    pub fn rolling(months_back: u32, months_forward: u32) -> Self {
        LedgerWindow::Rolling {
            months_back,
            months_forward,
        }
    }

    /// Calendar year containing `now`
    pub fn current_year(now: NaiveDateTime) -> Self {
        use chrono::Datelike;
        LedgerWindow::CalendarYear { year: now.year() }
    }

    /// Reject rolling bounds larger than [`MAX_WINDOW_MONTHS`]
    pub fn validate(&self) -> LedgerResult<()> {
        if let LedgerWindow::Rolling {
            months_back,
            months_forward,
        } = *self
        {
            for (name, value) in [("months_back", months_back), ("months_forward", months_forward)] {
                if value > MAX_WINDOW_MONTHS {
                    return Err(LedgerError::Config(format!(
                        "{} cannot exceed {}: {}",
                        name, MAX_WINDOW_MONTHS, value
                    )));
                }
            }
        }
        Ok(())
    }

    /// Months covered when the ledger is created at `now`, in chronological order
    pub fn months(&self, now: NaiveDateTime) -> LedgerResult<Vec<MonthKey>> {
        self.validate()?;

        match *self {
            LedgerWindow::Rolling {
                months_back,
                months_forward,
            } => {
                let current = MonthKey::from_datetime(now)?;
                // Both bounds are at most MAX_WINDOW_MONTHS after validation
                let back = months_back as i32;
                let forward = months_forward as i32;

                // Months past the supported year range are skipped rather than failing
                Ok((-back..=forward)
                    .filter_map(|offset| current.checked_add_months(offset))
                    .collect())
            }
            LedgerWindow::CalendarYear { year } => {
                (1..=12).map(|month| MonthKey::new(year, month)).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_rolling_window_bounds() {
        let months = LedgerWindow::rolling(12, 3).months(at(2025, 6, 15)).unwrap();
        assert_eq!(months.len(), 16);
        assert_eq!(months.first().unwrap().to_string(), "2024-06");
        assert_eq!(months.last().unwrap().to_string(), "2025-09");
        assert!(months.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_window_is_sixteen_months() {
        let months = LedgerWindow::default().months(at(2025, 1, 10)).unwrap();
        assert_eq!(months.len(), 16);
        assert_eq!(months.first().unwrap().to_string(), "2024-01");
        assert_eq!(months.last().unwrap().to_string(), "2025-04");
    }

    #[test]
    fn test_zero_width_window_holds_current_month() {
        let months = LedgerWindow::rolling(0, 0).months(at(2025, 6, 15)).unwrap();
        assert_eq!(months, vec![MonthKey::new(2025, 6).unwrap()]);
    }

    #[test]
    fn test_calendar_year_window() {
        let window = LedgerWindow::current_year(at(2025, 6, 15));
        assert_eq!(window, LedgerWindow::CalendarYear { year: 2025 });

        let months = window.months(at(2025, 6, 15)).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].to_string(), "2025-01");
        assert_eq!(months[11].to_string(), "2025-12");
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        let now = at(2025, 6, 15);
        let too_far_back = LedgerWindow::rolling(2_000_000_000, 0);
        assert!(matches!(too_far_back.months(now), Err(LedgerError::Config(_))));

        let too_far_forward = LedgerWindow::rolling(0, MAX_WINDOW_MONTHS + 1);
        assert!(matches!(too_far_forward.months(now), Err(LedgerError::Config(_))));

        let widest = LedgerWindow::rolling(MAX_WINDOW_MONTHS, MAX_WINDOW_MONTHS);
        let months = widest.months(now).unwrap();
        assert_eq!(months.len(), (MAX_WINDOW_MONTHS * 2 + 1) as usize);
    }

    #[test]
    fn test_calendar_year_rejects_unsupported_year() {
        let window = LedgerWindow::CalendarYear { year: 0 };
        assert!(window.months(at(2025, 6, 15)).is_err());
    }
}
