//! # Capture Recorder
//!
//! Producer-side facade over the capture log. The scan pipeline hands every
//! observed traffic event to [`CaptureRecorder::record`]; the recorder
//! assigns monotonic ids, fingerprints the exchange, tracks duplicate
//! hashes and feeds the shared [`CaptureLog`].

use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::diag::{DiagConfig, DiagLevel, DiagSink};
use crate::store::{CaptureLog, CaptureStats, MAX_CAPACITY};
use crate::types::{fingerprint, CaptureEntry, ObservedTraffic};

/// Configuration for capture recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Enable capture recording
    pub enabled: bool,

    /// Retention ceiling for the underlying log
    pub capacity: usize,

    /// Sample rate (0.0 - 1.0). 1.0 = record all
    pub sample_rate: f64,

    /// Diagnostic level shipped in the packaged configuration; overridden
    /// at runtime by `LEDGER_DIAG_LEVEL`
    pub packaged_diag_level: Option<DiagLevel>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            enabled: true,
            capacity: MAX_CAPACITY,
            sample_rate: 1.0,
            packaged_diag_level: Some(DiagLevel::Info),
        }
    }
}

/// Thread-safe capture recorder.
pub struct CaptureRecorder {
    /// Configuration
    config: RecorderConfig,

    /// Scan session identifier, stamped into diagnostics
    scan_id: String,

    /// Shared bounded store
    log: Arc<CaptureLog>,

    /// Diagnostic channel
    diag: DiagSink,

    /// Next producer-assigned entry id
    next_id: Arc<RwLock<u64>>,

    /// Events offered to the recorder
    total_seen: Arc<RwLock<u64>>,

    /// Events actually inserted
    total_recorded: Arc<RwLock<u64>>,

    /// Events dropped by sampling
    total_sampled_out: Arc<RwLock<u64>>,

    /// Events whose content hash was already mapped at insert time
    duplicate_hashes: Arc<RwLock<u64>>,
}

impl CaptureRecorder {
    /// Create a new capture recorder with its own log.
    pub fn new(config: RecorderConfig) -> Result<Self, String> {
        let diag_config = DiagConfig::from_env(config.packaged_diag_level)?;
        let diag = DiagSink::new(diag_config);
        let log = Arc::new(CaptureLog::with_capacity(config.capacity));

        Ok(CaptureRecorder {
            config,
            scan_id: Uuid::new_v4().to_string(),
            log,
            diag,
            next_id: Arc::new(RwLock::new(0)),
            total_seen: Arc::new(RwLock::new(0)),
            total_recorded: Arc::new(RwLock::new(0)),
            total_sampled_out: Arc::new(RwLock::new(0)),
            duplicate_hashes: Arc::new(RwLock::new(0)),
        })
    }

    /// Record one observed traffic event.
    ///
    /// Returns the assigned entry id, or `None` when recording is disabled
    /// or the event was sampled out. A duplicate content hash is noted in
    /// the diagnostics but the event is still inserted; the newer entry
    /// supersedes the hash mapping.
    pub fn record(&self, observed: ObservedTraffic) -> Option<u64> {
        if !self.config.enabled {
            return None;
        }

        *self.total_seen.write() += 1;

        // Apply sampling
        if self.config.sample_rate < 1.0 {
            use rand::Rng;
            let mut rng = rand::thread_rng();
            if rng.gen::<f64>() > self.config.sample_rate {
                *self.total_sampled_out.write() += 1;
                return None;
            }
        }

        let hash = fingerprint(&observed.http_method, &observed.path, &observed.request);
        let duplicate = self.log.contains_hash(&hash);

        let id = {
            let mut next = self.next_id.write();
            let id = *next;
            *next += 1;
            id
        };

        let entry = CaptureEntry::from_observed(id, hash, observed);

        if duplicate {
            *self.duplicate_hashes.write() += 1;
            if let Ok(detail) = serde_json::to_string(&entry.summary()) {
                self.diag
                    .debug(&format!("scan {}: duplicate content hash {}", self.scan_id, detail));
            }
        }

        self.log.add(entry);
        *self.total_recorded.write() += 1;

        Some(id)
    }

    /// The shared capture log, for consumer-side readers.
    pub fn log(&self) -> Arc<CaptureLog> {
        Arc::clone(&self.log)
    }

    /// Check if recording is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    /// Get recorder statistics
    pub fn stats(&self) -> RecorderStats {
        RecorderStats {
            scan_id: self.scan_id.clone(),
            total_seen: *self.total_seen.read(),
            total_recorded: *self.total_recorded.read(),
            total_sampled_out: *self.total_sampled_out.read(),
            duplicate_hashes: *self.duplicate_hashes.read(),
            sample_rate: self.config.sample_rate,
            store: self.log.stats(),
        }
    }
}

/// Recorder statistics
#[derive(Debug, Clone)]
pub struct RecorderStats {
    pub scan_id: String,
    pub total_seen: u64,
    pub total_recorded: u64,
    pub total_sampled_out: u64,
    pub duplicate_hashes: u64,
    pub sample_rate: f64,
    pub store: CaptureStats,
}

impl RecorderStats {
    pub fn duplicate_rate(&self) -> f64 {
        if self.total_recorded == 0 {
            0.0
        } else {
            self.duplicate_hashes as f64 / self.total_recorded as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectionState;

    fn observed(path: &str) -> ObservedTraffic {
        ObservedTraffic {
            source_label: "scanner".to_string(),
            service_origin: "https://example.test".to_string(),
            http_method: "GET".to_string(),
            path: path.to_string(),
            detection_state: DetectionState::Pending,
            request: Vec::new(),
            response: Vec::new(),
        }
    }

    #[test]
    fn test_record_assigns_increasing_ids() {
        let recorder = CaptureRecorder::new(RecorderConfig::default()).unwrap();

        let a = recorder.record(observed("/a")).unwrap();
        let b = recorder.record(observed("/b")).unwrap();
        let c = recorder.record(observed("/c")).unwrap();
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(recorder.log().row_count(), 3);
    }

    #[test]
    fn test_disabled_recorder_drops_events() {
        let config = RecorderConfig {
            enabled: false,
            ..Default::default()
        };
        let recorder = CaptureRecorder::new(config).unwrap();

        assert!(recorder.record(observed("/a")).is_none());
        assert_eq!(recorder.stats().total_seen, 0);
        assert_eq!(recorder.log().row_count(), 0);
    }

    #[test]
    fn test_duplicate_hash_counted_but_inserted() {
        let recorder = CaptureRecorder::new(RecorderConfig::default()).unwrap();

        recorder.record(observed("/same"));
        recorder.record(observed("/same"));
        recorder.record(observed("/other"));

        let stats = recorder.stats();
        assert_eq!(stats.total_recorded, 3);
        assert_eq!(stats.duplicate_hashes, 1);
        // Both same-path events remain positionally reachable.
        assert_eq!(recorder.log().row_count(), 3);
    }

    #[test]
    fn test_sampling_accounts_for_every_event() {
        let config = RecorderConfig {
            sample_rate: 0.5,
            ..Default::default()
        };
        let recorder = CaptureRecorder::new(config).unwrap();

        for i in 0..200 {
            recorder.record(observed(&format!("/p/{}", i)));
        }

        let stats = recorder.stats();
        assert_eq!(stats.total_seen, 200);
        assert_eq!(stats.total_recorded + stats.total_sampled_out, 200);
    }

    #[test]
    fn test_capacity_flows_through_to_log() {
        let config = RecorderConfig {
            capacity: 5,
            ..Default::default()
        };
        let recorder = CaptureRecorder::new(config).unwrap();

        for i in 0..12 {
            recorder.record(observed(&format!("/p/{}", i)));
        }

        assert_eq!(recorder.log().row_count(), 5);
        assert_eq!(recorder.stats().store.total_evicted, 7);
    }
}
