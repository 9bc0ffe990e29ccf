//! Core types and data structures for the remittance tracker

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest year a [`MonthKey`] may refer to
pub const MIN_YEAR: i32 = 1;
/// Latest year a [`MonthKey`] may refer to
pub const MAX_YEAR: i32 = 9999;

/// Identifier of a single calendar month
///
/// Ordering is chronological: year first, then month. Serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, rejecting months outside 1-12 and years outside the supported range
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(LedgerError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date
    pub fn from_date(date: NaiveDate) -> LedgerResult<Self> {
        Self::new(date.year(), date.month())
    }

    /// The month containing the given instant
    pub fn from_datetime(instant: NaiveDateTime) -> LedgerResult<Self> {
        Self::from_date(instant.date())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months elapsed since year 0, used for month arithmetic
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month - 1)
    }

    /// Shift by `months` (negative moves backwards); `None` if the result leaves the year range
    pub fn checked_add_months(&self, months: i32) -> Option<Self> {
        let ordinal = self.ordinal() + i64::from(months);
        let year = i32::try_from(ordinal.div_euclid(12)).ok()?;
        let month = u32::try_from(ordinal.rem_euclid(12)).ok()? + 1;
        Self::new(year, month).ok()
    }

    /// The following month, `None` after December of [`MAX_YEAR`]
    pub fn next(&self) -> Option<Self> {
        self.checked_add_months(1)
    }

    /// First calendar day of this month
    pub fn first_day(&self) -> NaiveDate {
        first_of_month(self.year, self.month)
    }

    /// First instant (00:00:00) of this month
    pub fn first_instant(&self) -> NaiveDateTime {
        midnight(self.first_day())
    }

    /// When the remittance for this month falls due: the first instant of the following month
    pub fn due_at(&self) -> NaiveDateTime {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        midnight(first_of_month(year, month))
    }
}

// Year and month are range-checked on construction, so both lookups always succeed.
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MAX)
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    /// Parse exactly `YYYY-MM`: four year digits, a dash, two month digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidMonthKey(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let all_digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !all_digits(year, 4) || !all_digits(month, 2) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Status of a month's transfer, derived at read time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    /// The transfer has been marked done
    Completed,
    /// Not done and the due instant has passed
    Overdue,
    /// Not done and not yet due
    Pending,
}

impl TransferStatus {
    /// Classify a record. Pure in its inputs; never cached.
    pub fn classify(completed: bool, due_at: NaiveDateTime, now: NaiveDateTime) -> Self {
        if completed {
            TransferStatus::Completed
        } else if now > due_at {
            TransferStatus::Overdue
        } else {
            TransferStatus::Pending
        }
    }
}

/// Transfer state for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Month this record covers
    pub key: MonthKey,
    /// Whether the remittance has been marked done
    pub completed: bool,
    /// When it was marked done; absent while incomplete
    pub completed_at: Option<NaiveDateTime>,
    /// First instant of the following month
    pub due_at: NaiveDateTime,
    /// Amount expected for this month
    pub amount: BigDecimal,
}

impl TransferRecord {
    /// Create an incomplete record for `key`
    pub fn new(key: MonthKey, amount: BigDecimal) -> Self {
        Self {
            key,
            completed: false,
            completed_at: None,
            due_at: key.due_at(),
            amount,
        }
    }

    /// Derived status at `now`
    pub fn status_at(&self, now: NaiveDateTime) -> TransferStatus {
        TransferStatus::classify(self.completed, self.due_at, now)
    }

    pub fn is_overdue_at(&self, now: NaiveDateTime) -> bool {
        self.status_at(now) == TransferStatus::Overdue
    }

    /// Flip completion. Returns the new `completed` value.
    pub(crate) fn toggle(&mut self, now: NaiveDateTime) -> bool {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
        self.completed
    }
}

/// A record together with its status at the instant it was read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub record: TransferRecord,
    pub status: TransferStatus,
}

/// Aggregate statistics over the whole ledger at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Instant the statistics were evaluated at
    pub as_of: NaiveDateTime,
    /// Number of months in the ledger
    pub total_months: usize,
    pub completed_count: usize,
    pub overdue_count: usize,
    /// `total_months - completed_count - overdue_count`
    pub pending_count: usize,
    /// Sum of amounts over completed months
    pub total_completed_amount: BigDecimal,
    /// Rounded percentage of completed months, 0-100
    pub completion_rate: u32,
}

/// Rounded (half-up) percentage of `part` over `whole`; 0 when `whole` is 0
pub fn completion_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let rate = (part as u64 * 200 + whole as u64) / (whole as u64 * 2);
    u32::try_from(rate).unwrap_or(u32::MAX)
}

/// Errors that can occur in the tracker
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Month not found in ledger: {0}")]
    NotFound(MonthKey),
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),
    #[error("Configuration error: {0}")]
    Config(String),
    /// Returned by [`crate::OverdueNotifier`] implementations that fail to deliver;
    /// the overdue monitor logs it and keeps running
    #[error("Notification error: {0}")]
    Notification(String),
}

/// Result type for tracker operations
pub type LedgerResult<T> = Result<T, LedgerError>;
