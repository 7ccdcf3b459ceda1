//! Bounded, hash-indexed capture log.
//!
//! Holds the most recent N captured traffic events in insertion order and
//! keeps a content-hash index over them for O(1) duplicate lookup. The
//! sequence and the index are one unit of state: every mutation updates
//! both inside a single critical section.
//!
//! # Structure
//!
//! - `entries`: VecDeque of shared capture records, oldest at the front,
//!   newest at the back.
//! - `index`: content hash → sequence number. Sequence numbers are assigned
//!   per insertion, increase by one and never recycle; the position of a
//!   live entry is `seq - head_seq`, so the index survives front eviction
//!   without rewriting.
//!
//! # Capacity
//!
//! The ceiling is enforced inline in `add`: after appending, the front is
//! popped until the length equals the capacity. No caller can observe the
//! sequence above capacity, and there is no background eviction task.
//!
//! # Index tie-break
//!
//! The index always reflects the most recently inserted entry per hash.
//! When an evicted entry's mapping has already been superseded by a newer
//! same-hash entry, eviction leaves the mapping alone. When the indexed
//! entry itself is evicted, the hash becomes unmapped even if an older
//! surviving entry shares it; the index does not fall back.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::store::types::CaptureStats;
use crate::types::CaptureEntry;

/// Default retention ceiling for a capture log.
pub const MAX_CAPACITY: usize = 10_000;

/// Sequence, index and counters, guarded as one unit.
struct LogState {
    /// Retained entries, oldest front / newest back
    entries: VecDeque<Arc<CaptureEntry>>,
    /// content hash → sequence number of the most recent entry with it
    index: HashMap<String, u64>,
    /// Sequence number of the entry currently at the front
    head_seq: u64,
    /// Lifetime insertion count
    total_inserted: u64,
    /// Lifetime eviction count
    total_evicted: u64,
}

/// Bounded in-memory log of captured traffic events with a content-hash
/// index.
///
/// # Thread Safety
/// - One writer (the scan pipeline) and any number of readers (UI refresh,
///   report generation) may operate concurrently.
/// - All state sits behind a single `RwLock`; readers share, `add` takes
///   the write lock, so a reader never sees the index referencing an
///   evicted position or the sequence above capacity.
pub struct CaptureLog {
    capacity: usize,
    state: RwLock<LogState>,
}

impl std::fmt::Debug for CaptureLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("CaptureLog")
            .field("capacity", &self.capacity)
            .field("entries", &state.entries.len())
            .field("index_entries", &state.index.len())
            .finish()
    }
}

impl Default for CaptureLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureLog {
    /// Create a log with the default 10,000-entry ceiling.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CAPACITY)
    }

    /// Create a log with an explicit ceiling. A ceiling of 0 is raised
    /// to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        CaptureLog {
            capacity: capacity.max(1),
            state: RwLock::new(LogState {
                entries: VecDeque::with_capacity(capacity.max(1).min(MAX_CAPACITY)),
                index: HashMap::new(),
                head_seq: 0,
                total_inserted: 0,
                total_evicted: 0,
            }),
        }
    }

    /// Append an entry, index it by content hash, and evict from the front
    /// until the length is back at the ceiling.
    ///
    /// The new entry's hash mapping is written before eviction runs, so a
    /// same-hash entry falling off the front never unmaps the new one.
    /// O(1) amortized; no I/O.
    pub fn add(&self, entry: CaptureEntry) {
        let entry = Arc::new(entry);
        let mut state = self.state.write();

        let seq = state.head_seq + state.entries.len() as u64;
        state.index.insert(entry.content_hash.clone(), seq);
        state.entries.push_back(entry);
        state.total_inserted += 1;

        while state.entries.len() > self.capacity {
            if let Some(evicted) = state.entries.pop_front() {
                let evicted_seq = state.head_seq;
                state.head_seq += 1;
                state.total_evicted += 1;

                // Unmap only if the mapping still points at the evicted
                // entry; a newer same-hash entry keeps its mapping.
                if state.index.get(&evicted.content_hash) == Some(&evicted_seq) {
                    state.index.remove(&evicted.content_hash);
                }
            }
        }
    }

    /// Entry at the given ordinal position (0 = oldest retained).
    ///
    /// Out-of-range reads are reported to the caller, never clamped.
    pub fn get(&self, index: usize) -> Result<Arc<CaptureEntry>, String> {
        let state = self.state.read();
        state.entries.get(index).cloned().ok_or_else(|| {
            format!(
                "row index {} out of range (rows: {})",
                index,
                state.entries.len()
            )
        })
    }

    /// Number of currently retained entries, always `<= capacity()`.
    pub fn row_count(&self) -> usize {
        self.state.read().entries.len()
    }

    /// The entry currently indexed under `hash`, or `None` when the hash is
    /// unmapped or its indexed entry was evicted.
    pub fn find_by_hash(&self, hash: &str) -> Option<Arc<CaptureEntry>> {
        let state = self.state.read();
        let seq = *state.index.get(hash)?;
        let pos = seq.checked_sub(state.head_seq)?;
        state.entries.get(pos as usize).cloned()
    }

    /// Whether any retained entry is currently indexed under `hash`.
    pub fn contains_hash(&self, hash: &str) -> bool {
        self.find_by_hash(hash).is_some()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Point-in-time statistics snapshot.
    pub fn stats(&self) -> CaptureStats {
        let state = self.state.read();
        CaptureStats {
            entries: state.entries.len(),
            capacity: self.capacity,
            index_entries: state.index.len(),
            total_inserted: state.total_inserted,
            total_evicted: state.total_evicted,
        }
    }
}
