//! Background sync scheduler.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::sync::reconciler::{SyncOutcome, TableReconciler};

/// Configuration for the sync scheduler.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Interval between reconciliation attempts.
    pub interval: Duration,
    /// Maximum number of consecutive failures before backing off.
    pub max_failures: u32,
    /// Backoff multiplier for failures.
    pub backoff_multiplier: f64,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            max_failures: 3,
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_secs(300),
        }
    }
}

/// Handle for controlling a running sync scheduler.
pub struct SyncHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
}

impl SyncHandle {
    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background scheduler driving the table reconciler.
pub struct SyncScheduler {
    reconciler: Arc<TableReconciler>,
    config: SyncConfig,
    /// Current backoff duration.
    current_backoff: Mutex<Duration>,
    /// Number of consecutive failed passes.
    failure_count: Mutex<u32>,
}

impl SyncScheduler {
    /// Creates a new sync scheduler.
    pub fn new(reconciler: Arc<TableReconciler>, config: SyncConfig) -> Self {
        Self {
            reconciler,
            current_backoff: Mutex::new(config.interval),
            failure_count: Mutex::new(0),
            config,
        }
    }

    /// Creates a scheduler with default configuration.
    pub fn with_defaults(reconciler: Arc<TableReconciler>) -> Self {
        Self::new(reconciler, SyncConfig::default())
    }

    /// Starts the background sync task.
    ///
    /// Returns a handle that can be used to stop the scheduler.
    pub fn start(self) -> SyncHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = SyncHandle { shutdown_tx };

        tokio::spawn(self.run(shutdown_rx));

        handle
    }

    /// Runs the scheduler loop.
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let initial_interval = self.config.interval;
        let mut interval_timer = interval(initial_interval);

        info!(
            "Starting table sync scheduler with interval {:?}",
            initial_interval
        );

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {
                    self.do_sync().await;

                    // Adjust interval based on current backoff
                    let current = *self.current_backoff.lock();
                    if current != interval_timer.period() {
                        interval_timer = interval(current);
                    }
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("Table sync scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Performs a single reconciliation attempt.
    async fn do_sync(&self) {
        debug!("Starting scheduled table sync");

        match self.reconciler.run().await {
            Ok(SyncOutcome::Synced) => {
                self.reset_backoff();
                debug!("Scheduled sync converged the catalog");
            },
            Ok(SyncOutcome::NotNeeded) => {
                self.reset_backoff();
            },
            Err(e) => {
                self.increase_backoff();
                warn!("Scheduled sync failed: {}", e);
            },
        }
    }

    /// Resets the backoff to the base interval.
    fn reset_backoff(&self) {
        *self.failure_count.lock() = 0;
        let mut backoff = self.current_backoff.lock();
        *backoff = self.config.interval;
    }

    /// Increases the backoff duration after a failure.
    fn increase_backoff(&self) {
        let failure_count = {
            let mut count = self.failure_count.lock();
            *count += 1;
            *count
        };

        if failure_count >= self.config.max_failures {
            let mut backoff = self.current_backoff.lock();
            let new_backoff =
                Duration::from_secs_f64(backoff.as_secs_f64() * self.config.backoff_multiplier);
            *backoff = new_backoff.min(self.config.max_backoff);

            debug!(
                "Increased sync backoff to {:?} after {} failures",
                *backoff, failure_count
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_default() {
        let config = SyncConfig::default();
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.max_failures, 3);
        assert_eq!(config.backoff_multiplier, 2.0);
        assert_eq!(config.max_backoff, Duration::from_secs(300));
    }

    #[test]
    fn test_sync_handle_stop() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = SyncHandle { shutdown_tx };

        assert!(!*shutdown_rx.borrow());
        handle.stop();
        assert!(shutdown_rx.has_changed().unwrap_or(false) || *shutdown_rx.borrow());
    }
}
