//! # Capture Ledger
//!
//! Bounded, hash-indexed in-memory log for security scan traffic.
//!
//! A scan pipeline pushes observed HTTP exchanges in through the
//! [`CaptureRecorder`]; UI and report readers pull them back out of the
//! shared [`CaptureLog`] by position or content hash. The log holds the
//! 10,000 most recent events, evicting the oldest as new ones arrive, and
//! keeps its hash index consistent with the sequence at every step.

pub mod diag;
pub mod monitor;
pub mod recorder;
pub mod store;
pub mod types;

pub use diag::{DiagConfig, DiagLevel, DiagSink};
pub use monitor::{CaptureMonitor, MonitorConfig};
pub use recorder::{CaptureRecorder, RecorderConfig, RecorderStats};
pub use store::{CaptureLog, CaptureStats, MAX_CAPACITY};
pub use types::{CaptureEntry, DetectionState, ObservedTraffic, RequestArtifact};
