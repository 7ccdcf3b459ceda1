//! Periodic capture statistics reporter - background task for long scans.
//!
//! An unattended scan can run for hours while the log churns at its
//! ceiling. The reporter periodically snapshots store statistics and emits
//! one INFO line per tick, giving the operator a heartbeat without touching
//! the store's contents.
//!
//! The reporter is read-only. Eviction stays synchronous inside
//! `CaptureLog::add`, so there is no race between this task and insertion.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::store::{CaptureLog, CaptureStats};
use crate::types::now_ms;
use log::info;

/// Configuration for the stats reporter.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval between reports
    pub report_interval: Duration,
    /// Whether the reporter is enabled
    pub enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            report_interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

/// Periodic reporter over a shared capture log.
///
/// Runs as a background task spawned next to the scan pipeline.
pub struct CaptureMonitor {
    /// Shared store being observed
    log: Arc<CaptureLog>,
    /// Reporter configuration
    config: MonitorConfig,
    /// Timestamp of the last emitted report
    last_report_at: Arc<RwLock<u64>>,
}

impl CaptureMonitor {
    pub fn new(log: Arc<CaptureLog>, config: MonitorConfig) -> Self {
        Self {
            log,
            config,
            last_report_at: Arc::new(RwLock::new(now_ms())),
        }
    }

    /// Milliseconds-since-epoch of the last report, or creation time if no
    /// report has been emitted yet.
    pub fn last_report(&self) -> u64 {
        *self.last_report_at.read()
    }

    /// Starts the reporter background task.
    ///
    /// Runs indefinitely and should be spawned as a tokio task. Returns
    /// immediately if the reporter is disabled in config.
    pub async fn start(self: Arc<Self>) {
        if !self.config.enabled {
            info!("Capture stats reporter is disabled, skipping");
            return;
        }

        info!(
            "Starting capture stats reporter with {}-second interval",
            self.config.report_interval.as_secs()
        );

        let mut ticker = interval(self.config.report_interval);

        loop {
            ticker.tick().await;
            self.report_once();
        }
    }

    /// Snapshot the store and emit one report line.
    pub fn report_once(&self) -> CaptureStats {
        let stats = self.log.stats();

        info!(
            "capture log: {}/{} entries ({:.0}% full), {} indexed hashes, {} inserted, {} evicted",
            stats.entries,
            stats.capacity,
            stats.fill_ratio() * 100.0,
            stats.index_entries,
            stats.total_inserted,
            stats.total_evicted
        );

        *self.last_report_at.write() = now_ms();
        stats
    }
}
