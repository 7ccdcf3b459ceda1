//! Background observation of a running capture log.

pub mod reporter;

pub use reporter::{CaptureMonitor, MonitorConfig};
