//! Store-level data structures.

use serde::{Deserialize, Serialize};

/// Point-in-time statistics for a capture log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Currently retained entries
    pub entries: usize,
    /// Retention ceiling
    pub capacity: usize,
    /// Live content-hash mappings (always `<= entries`)
    pub index_entries: usize,
    /// Entries inserted over the log's lifetime
    pub total_inserted: u64,
    /// Entries evicted over the log's lifetime
    pub total_evicted: u64,
}

impl CaptureStats {
    /// Fraction of the ceiling currently in use.
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.entries as f64 / self.capacity as f64
        }
    }
}
