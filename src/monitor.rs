//! Periodic overdue detection
//!
//! Statuses are always derived from the clock when read, so nothing here is needed for
//! correctness. The monitor exists to surface the moment a month turns overdue to an
//! [`OverdueNotifier`], on a fixed interval, for as long as its handle is alive.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;

use crate::ledger::Ledger;
use crate::traits::*;
use crate::types::*;

/// Ledger shared between the owning session and its overdue monitor
pub type SharedLedger<C> = Arc<RwLock<Ledger<C>>>;

/// Wrap a ledger for use with [`OverdueMonitor`]
pub fn share<C: Clock>(ledger: Ledger<C>) -> SharedLedger<C> {
    Arc::new(RwLock::new(ledger))
}

/// Remembers which overdue months have already been reported
#[derive(Debug, Default, Clone)]
pub struct OverdueTracker {
    reported: HashSet<MonthKey>,
}

impl OverdueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that are overdue at `now` and were not overdue at the previous poll
    ///
    /// A month that stops being overdue (it was marked complete) is forgotten, so marking it
    /// incomplete again reports it again.
    pub fn poll<C: Clock>(&mut self, ledger: &Ledger<C>, now: NaiveDateTime) -> Vec<TransferRecord> {
        let mut newly_overdue = Vec::new();

        for record in ledger.records() {
            if record.is_overdue_at(now) {
                if self.reported.insert(record.key) {
                    newly_overdue.push(record.clone());
                }
            } else {
                self.reported.remove(&record.key);
            }
        }

        newly_overdue
    }

    /// Whether `key` is currently counted as reported
    pub fn is_reported(&self, key: MonthKey) -> bool {
        self.reported.contains(&key)
    }
}

/// Background task that checks a shared ledger for newly overdue months
///
/// Call [`OverdueMonitor::shutdown`] to stop it gracefully. Dropping the handle aborts
/// the task, so the timer never outlives its owner.
pub struct OverdueMonitor {
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl OverdueMonitor {
    /// Spawn the monitor on the current tokio runtime
    ///
    /// The first check runs immediately, then once per `period`.
    pub fn start<C, N>(ledger: SharedLedger<C>, notifier: N, period: Duration) -> Self
    where
        C: Clock + 'static,
        N: OverdueNotifier + 'static,
    {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            tracing::info!(period_ms = period.as_millis() as u64, "Overdue monitor started");

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut tracker = OverdueTracker::new();

            loop {
                tokio::select! {
                    _ = signal.notified() => {
                        tracing::info!("Overdue monitor received shutdown signal");
                        break;
                    }
                    _ = interval.tick() => {
                        let newly_overdue = {
                            let ledger = ledger.read().await;
                            let now = ledger.now();
                            tracker.poll(&*ledger, now)
                        };

                        for record in &newly_overdue {
                            if let Err(e) = notifier.notify_overdue(record).await {
                                tracing::warn!(month = %record.key, error = %e, "Overdue notification failed");
                            }
                        }
                    }
                }
            }

            tracing::info!("Overdue monitor stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Whether the background task is still running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the task to stop and wait for it to finish
    pub async fn shutdown(mut self) {
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Overdue monitor task ended abnormally");
            }
        }
    }
}

impl Drop for OverdueMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Notifier that writes a warning log line per overdue month
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl OverdueNotifier for LogNotifier {
    async fn notify_overdue(&self, record: &TransferRecord) -> LedgerResult<()> {
        tracing::warn!(
            month = %record.key,
            due_at = %record.due_at,
            amount = %record.amount,
            "Remittance overdue"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerWindow;
    use crate::utils::FixedClock;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn key(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn small_ledger(clock: FixedClock) -> Ledger<FixedClock> {
        Ledger::new(clock, LedgerWindow::rolling(1, 1), BigDecimal::from(10000)).unwrap()
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        seen: Arc<Mutex<Vec<MonthKey>>>,
    }

    impl RecordingNotifier {
        fn seen(&self) -> Vec<MonthKey> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OverdueNotifier for RecordingNotifier {
        async fn notify_overdue(&self, record: &TransferRecord) -> LedgerResult<()> {
            self.seen.lock().unwrap().push(record.key);
            Ok(())
        }
    }

    #[test]
    fn test_tracker_reports_each_transition_once() {
        let clock = FixedClock::new(at(2025, 6, 15));
        let mut ledger = small_ledger(clock.clone());
        let mut tracker = OverdueTracker::new();

        let first: Vec<_> = tracker
            .poll(&ledger, clock.now())
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(first, vec![key(2025, 5)]);
        assert!(tracker.poll(&ledger, clock.now()).is_empty());

        clock.set(at(2025, 7, 2));
        let second: Vec<_> = tracker
            .poll(&ledger, clock.now())
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(second, vec![key(2025, 6)]);

        // Completing forgets the month; un-completing reports it again
        ledger.toggle(key(2025, 5)).unwrap();
        assert!(tracker.poll(&ledger, clock.now()).is_empty());
        assert!(!tracker.is_reported(key(2025, 5)));

        ledger.toggle(key(2025, 5)).unwrap();
        let third: Vec<_> = tracker
            .poll(&ledger, clock.now())
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(third, vec![key(2025, 5)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_notifies_and_stops() {
        let clock = FixedClock::new(at(2025, 6, 15));
        let ledger = share(small_ledger(clock.clone()));
        let notifier = RecordingNotifier::default();

        let monitor = OverdueMonitor::start(
            ledger.clone(),
            notifier.clone(),
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(monitor.is_running());
        assert_eq!(notifier.seen(), vec![key(2025, 5)]);

        clock.set(at(2025, 7, 2));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(notifier.seen(), vec![key(2025, 5), key(2025, 6)]);

        monitor.shutdown().await;

        clock.set(at(2025, 8, 2));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(notifier.seen().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_monitor_stops_checks() {
        let clock = FixedClock::new(at(2025, 6, 15));
        let ledger = share(small_ledger(clock.clone()));
        let notifier = RecordingNotifier::default();

        let monitor = OverdueMonitor::start(ledger, notifier.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        drop(monitor);

        clock.set(at(2025, 7, 2));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(notifier.seen(), vec![key(2025, 5)]);
    }

    struct FailingNotifier {
        attempts: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl OverdueNotifier for FailingNotifier {
        async fn notify_overdue(&self, record: &TransferRecord) -> LedgerResult<()> {
            *self.attempts.lock().unwrap() += 1;
            Err(LedgerError::Notification(format!("no channel for {}", record.key)))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_notification_keeps_monitor_running() {
        let clock = FixedClock::new(at(2025, 6, 15));
        let ledger = share(small_ledger(clock.clone()));
        let attempts = Arc::new(Mutex::new(0));

        let monitor = OverdueMonitor::start(
            ledger,
            FailingNotifier {
                attempts: attempts.clone(),
            },
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(15)).await;
        assert_eq!(*attempts.lock().unwrap(), 1);

        clock.set(at(2025, 7, 2));
        tokio::time::sleep(Duration::from_millis(15)).await;
        assert!(monitor.is_running());
        assert_eq!(*attempts.lock().unwrap(), 2);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn test_log_notifier_accepts_records() {
        let record = TransferRecord::new(key(2025, 5), BigDecimal::from(10000));
        assert!(LogNotifier.notify_overdue(&record).await.is_ok());
    }
}
