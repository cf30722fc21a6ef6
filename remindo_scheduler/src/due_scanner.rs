use std::{collections::HashSet, sync::Arc, time::Duration};

use chrono::{NaiveDateTime, TimeDelta};
use tokio::{
    task::{self, JoinHandle},
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use remindo_models::{
    reminder::ReminderId,
    settings::{MonthlyWrap, ScannerSettings},
};
use remindo_storage::ReminderStorage;

use crate::{clock::Clock, delivery::ReminderNotifier, occurrence::OccurrenceCalculator};

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);
const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct DueScannerOptions {
    pub interval: Duration,
    pub tolerance: Duration,
    /// Notify each occurrence at most once instead of on every cycle it
    /// stays inside the tolerance window.
    pub deduplicate: bool,
    pub monthly_wrap: MonthlyWrap,
}

impl Default for DueScannerOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SCAN_INTERVAL,
            tolerance: DEFAULT_TOLERANCE,
            deduplicate: false,
            monthly_wrap: MonthlyWrap::default(),
        }
    }
}

impl From<&ScannerSettings> for DueScannerOptions {
    fn from(value: &ScannerSettings) -> Self {
        Self {
            interval: Duration::from_secs(value.interval_secs),
            tolerance: Duration::from_secs(value.tolerance_secs),
            deduplicate: value.deduplicate,
            monthly_wrap: value.monthly_wrap,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub checked: usize,
    pub notified: usize,
    pub failed: usize,
}

type Occurrence = (ReminderId, NaiveDateTime);

pub struct DueScanner {
    storage: Arc<dyn ReminderStorage>,
    notifier: Arc<dyn ReminderNotifier>,
    clock: Arc<dyn Clock>,
    calculator: OccurrenceCalculator,
    interval: Duration,
    tolerance: TimeDelta,
    notified: Option<HashSet<Occurrence>>,
}

/// A running scanner. Dropping it leaves the task running; call [`stop`](Self::stop).
pub struct DueScannerHandle {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl DueScannerHandle {
    pub async fn stop(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.task.await {
            log::error!("Due scanner task ended abnormally: {e}");
        }
    }
}

impl DueScanner {
    pub fn new(
        storage: Arc<dyn ReminderStorage>,
        notifier: Arc<dyn ReminderNotifier>,
        clock: Arc<dyn Clock>,
        options: DueScannerOptions,
    ) -> Self {
        let tolerance = TimeDelta::from_std(options.tolerance).unwrap_or(TimeDelta::MAX);
        let interval = if options.interval < MIN_SCAN_INTERVAL {
            log::warn!(
                "Scan interval {:?} is too short, using {:?}",
                options.interval,
                MIN_SCAN_INTERVAL
            );
            MIN_SCAN_INTERVAL
        } else {
            options.interval
        };

        Self {
            storage,
            notifier,
            clock,
            calculator: OccurrenceCalculator::new(options.monthly_wrap),
            interval,
            tolerance,
            notified: options.deduplicate.then(HashSet::new),
        }
    }

    /// Spawns the periodic scan. The first cycle runs one interval after start.
    pub fn start(self) -> DueScannerHandle {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        log::info!(
            "Starting due scanner [interval = {:?}, tolerance = {}s]",
            self.interval,
            self.tolerance.num_seconds()
        );
        let task = task::spawn(self.run(task_cancellation_token));

        DueScannerHandle {
            task,
            cancellation_token,
        }
    }

    async fn run(mut self, cancellation_token: CancellationToken) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    log::info!("Due scanner shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    self.scan(now).await;
                }
            }
        }
    }

    /// Runs one due scan cycle against a fresh snapshot of the store.
    pub async fn scan(&mut self, now: NaiveDateTime) -> ScanReport {
        log::debug!("[SCAN] Checking reminders at {now}");
        let mut report = ScanReport::default();

        let reminders = match self.storage.load_all().await {
            Ok(reminders) => reminders,
            Err(e) => {
                log::error!("[SCAN] Could not load reminders, skipping this cycle: {e:#}");
                return report;
            }
        };

        for reminder in reminders.iter().filter(|r| !r.done) {
            report.checked += 1;

            let Some(occurrence) = self.calculator.next_occurrence(reminder, now) else {
                continue;
            };
            if (occurrence - now).abs() >= self.tolerance {
                continue;
            }

            if let Some(notified) = &mut self.notified {
                if !notified.insert((reminder.id, occurrence)) {
                    log::debug!("[SCAN] Already notified reminder {} for {occurrence}", reminder.id);
                    continue;
                }
            }

            match self.notifier.notify(reminder).await {
                Ok(()) => {
                    log::info!("[NOTIFY] Reminder {} due at {occurrence}", reminder.id);
                    report.notified += 1;
                }
                Err(e) => {
                    log::warn!("[NOTIFY] Failed to notify reminder {}: {e:#}", reminder.id);
                    report.failed += 1;
                    if let Some(notified) = &mut self.notified {
                        notified.remove(&(reminder.id, occurrence));
                    }
                }
            }
        }

        self.forget_stale(now);
        report
    }

    fn forget_stale(&mut self, now: NaiveDateTime) {
        let tolerance = self.tolerance;
        if let Some(notified) = &mut self.notified {
            notified.retain(|(_, occurrence)| {
                occurrence
                    .checked_add_signed(tolerance)
                    .is_none_or(|window_end| window_end >= now)
            });
        }
    }
}
