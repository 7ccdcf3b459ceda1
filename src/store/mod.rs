//! Bounded capture storage.
//!
//! One component carries the weight here: [`CaptureLog`], the ordered,
//! capacity-bounded sequence of captured traffic events with a content-hash
//! index kept consistent at every mutation.

pub mod capture_log;
pub mod types;

pub use capture_log::{CaptureLog, MAX_CAPACITY};
pub use types::CaptureStats;
