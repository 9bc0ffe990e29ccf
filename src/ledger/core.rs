//! The month ledger: one transfer record per month of a fixed window

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::ledger::LedgerWindow;
use crate::traits::*;
use crate::types::*;

/// Amount expected per month when none is configured
pub const DEFAULT_TRANSFER_AMOUNT: i64 = 50_000;

/// In-memory ledger of monthly transfer records
///
/// The set of months is fixed when the ledger is created. Afterwards the only mutation is
/// [`Ledger::toggle`]; statuses and statistics are derived from the clock on every read.
pub struct Ledger<C: Clock> {
    id: Uuid,
    clock: C,
    window: LedgerWindow,
    created_at: NaiveDateTime,
    records: BTreeMap<MonthKey, TransferRecord>,
}

impl<C: Clock> Ledger<C> {
    /// Create a ledger populated for `window` relative to the clock's current time
    pub fn new(clock: C, window: LedgerWindow, amount: BigDecimal) -> LedgerResult<Self> {
        let created_at = clock.now();
        let records = window
            .months(created_at)?
            .into_iter()
            .map(|key| (key, TransferRecord::new(key, amount.clone())))
            .collect::<BTreeMap<_, _>>();

        let id = Uuid::new_v4();
        tracing::info!(
            ledger_id = %id,
            months = records.len(),
            window = ?window,
            "Created remittance ledger"
        );

        Ok(Self {
            id,
            clock,
            window,
            created_at,
            records,
        })
    }

    /// Create a ledger with the default 16-month rolling window and default amount
    pub fn with_defaults(clock: C) -> LedgerResult<Self> {
        Self::new(
            clock,
            LedgerWindow::default(),
            BigDecimal::from(DEFAULT_TRANSFER_AMOUNT),
        )
    }

    /// Create a ledger from loaded configuration
    pub fn from_config(clock: C, config: &TrackerConfig) -> LedgerResult<Self> {
        Self::new(clock, config.window, config.default_amount.clone())
    }

    /// Identifier of this ledger instance, used to correlate log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn window(&self) -> LedgerWindow {
        self.window
    }

    /// Instant the ledger was populated at
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Current time according to the ledger's clock
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Flip the completion state of the month at `key`
    ///
    /// Marking complete stamps `completed_at` with the current time; marking incomplete
    /// clears it. Unknown months fail with [`LedgerError::NotFound`] and change nothing.
    pub fn toggle(&mut self, key: MonthKey) -> LedgerResult<&TransferRecord> {
        let now = self.clock.now();
        let record = self
            .records
            .get_mut(&key)
            .ok_or(LedgerError::NotFound(key))?;

        let completed = record.toggle(now);
        tracing::info!(
            ledger_id = %self.id,
            month = %key,
            completed,
            "Toggled remittance status"
        );

        Ok(record)
    }

    /// Get the record for a month
    pub fn get(&self, key: MonthKey) -> Option<&TransferRecord> {
        self.records.get(&key)
    }

    /// Get the record for a month, returning an error if it is outside the ledger
    pub fn get_required(&self, key: MonthKey) -> LedgerResult<&TransferRecord> {
        self.records.get(&key).ok_or(LedgerError::NotFound(key))
    }

    pub fn contains(&self, key: MonthKey) -> bool {
        self.records.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Months in chronological order
    pub fn keys(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.records.keys().copied()
    }

    /// Records in chronological order
    pub fn records(&self) -> impl Iterator<Item = &TransferRecord> + '_ {
        self.records.values()
    }

    /// Records newest month first, each with its status evaluated now
    pub fn records_for_display(&self) -> Vec<RecordView> {
        self.records_for_display_at(self.clock.now())
    }

    /// Records newest month first, each with its status evaluated at `now`
    pub fn records_for_display_at(&self, now: NaiveDateTime) -> Vec<RecordView> {
        self.records
            .values()
            .rev()
            .map(|record| RecordView {
                record: record.clone(),
                status: record.status_at(now),
            })
            .collect()
    }

    /// Status of a month right now
    pub fn status(&self, key: MonthKey) -> LedgerResult<TransferStatus> {
        self.status_at(key, self.clock.now())
    }

    /// Status of a month at `now`
    pub fn status_at(&self, key: MonthKey, now: NaiveDateTime) -> LedgerResult<TransferStatus> {
        Ok(self.get_required(key)?.status_at(now))
    }

    /// Number of months marked complete
    pub fn completed_count(&self) -> usize {
        self.records.values().filter(|r| r.completed).count()
    }

    /// Sum of amounts over completed months
    pub fn total_completed_amount(&self) -> BigDecimal {
        self.records
            .values()
            .filter(|r| r.completed)
            .map(|r| &r.amount)
            .sum()
    }

    /// Rounded percentage of months marked complete
    pub fn completion_rate(&self) -> u32 {
        completion_percentage(self.completed_count(), self.records.len())
    }

    /// Months that are overdue right now, chronological
    pub fn overdue_keys(&self) -> Vec<MonthKey> {
        self.overdue_keys_at(self.clock.now())
    }

    /// Months that are overdue at `now`, chronological
    pub fn overdue_keys_at(&self, now: NaiveDateTime) -> Vec<MonthKey> {
        self.records
            .values()
            .filter(|r| r.is_overdue_at(now))
            .map(|r| r.key)
            .collect()
    }

    /// Aggregate statistics right now
    pub fn summary(&self) -> LedgerSummary {
        self.summary_at(self.clock.now())
    }

    /// Aggregate statistics at `now`
    pub fn summary_at(&self, now: NaiveDateTime) -> LedgerSummary {
        let total_months = self.records.len();
        let mut completed_count = 0;
        let mut overdue_count = 0;
        let mut total_completed_amount = BigDecimal::from(0);

        for record in self.records.values() {
            match record.status_at(now) {
                TransferStatus::Completed => {
                    completed_count += 1;
                    total_completed_amount += &record.amount;
                }
                TransferStatus::Overdue => overdue_count += 1,
                TransferStatus::Pending => {}
            }
        }

        LedgerSummary {
            as_of: now,
            total_months,
            completed_count,
            overdue_count,
            pending_count: total_months - completed_count - overdue_count,
            total_completed_amount,
            completion_rate: completion_percentage(completed_count, total_months),
        }
    }
}
