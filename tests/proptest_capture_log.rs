//! Property-based tests for capture log retention and index consistency.
//!
//! Verifies the structural invariants across randomized capacities, insert
//! counts and hash collision patterns:
//! - row count never exceeds the ceiling, at any step
//! - eviction is strict FIFO: the retained window is the N most recent
//! - the hash index matches a reference model (newest mapping per hash,
//!   unmapped once the mapped entry is evicted, no fallback)
//! - the index never grows past the sequence

use proptest::prelude::*;
use std::collections::HashMap;

use ledger::store::CaptureLog;
use ledger::types::{CaptureEntry, DetectionState, ObservedTraffic};

fn test_entry(id: u64, hash: String) -> CaptureEntry {
    let observed = ObservedTraffic {
        source_label: "proxy".to_string(),
        service_origin: "https://target.test".to_string(),
        http_method: "GET".to_string(),
        path: format!("/p/{}", id),
        detection_state: DetectionState::Pending,
        request: Vec::new(),
        response: Vec::new(),
    };
    CaptureEntry::from_observed(id, hash, observed)
}

// =============================================================================
// Proptest strategies
// =============================================================================

/// Capacity small enough to force plenty of eviction.
fn arb_capacity() -> impl Strategy<Value = usize> {
    1usize..=64
}

/// A sequence of hash choices drawn from a small pool, so collisions and
/// supersession happen often.
fn arb_hash_choices() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..=15, 0..=400)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Inserting n unique-hash entries retains exactly the min(n, capacity)
    /// most recent, in insertion order.
    #[test]
    fn fifo_window_holds(capacity in arb_capacity(), n in 0usize..=300) {
        let log = CaptureLog::with_capacity(capacity);

        for i in 0..n as u64 {
            log.add(test_entry(i, format!("hash-{}", i)));
        }

        let expected = n.min(capacity);
        prop_assert_eq!(log.row_count(), expected);

        let first_retained = (n - expected) as u64;
        for pos in 0..expected {
            let e = log.get(pos).unwrap();
            prop_assert_eq!(e.id, first_retained + pos as u64);
        }

        // One past the end is an error, never a stale entry.
        prop_assert!(log.get(expected).is_err());
    }

    /// Row count never exceeds the ceiling after any single insertion.
    #[test]
    fn no_transient_overshoot(capacity in arb_capacity(), choices in arb_hash_choices()) {
        let log = CaptureLog::with_capacity(capacity);

        for (i, c) in choices.iter().enumerate() {
            log.add(test_entry(i as u64, format!("hash-{}", c)));
            prop_assert!(log.row_count() <= capacity);

            let stats = log.stats();
            prop_assert!(stats.index_entries <= stats.entries);
        }
    }

    /// The hash index agrees with a reference model: each hash maps to its
    /// most recently inserted entry while that entry is retained, and is
    /// unmapped once it has been evicted, with no fallback to older
    /// survivors.
    #[test]
    fn index_matches_reference_model(capacity in arb_capacity(), choices in arb_hash_choices()) {
        let log = CaptureLog::with_capacity(capacity);

        // hash -> sequence number of its most recent insertion
        let mut newest: HashMap<String, u64> = HashMap::new();
        let n = choices.len() as u64;

        for (i, c) in choices.iter().enumerate() {
            let hash = format!("hash-{}", c);
            newest.insert(hash.clone(), i as u64);
            log.add(test_entry(i as u64, hash));
        }

        let head = n.saturating_sub(capacity as u64);
        for (hash, seq) in &newest {
            match log.find_by_hash(hash) {
                Some(e) => {
                    prop_assert!(*seq >= head, "mapped entry must be retained");
                    prop_assert_eq!(e.id, *seq);
                }
                None => {
                    prop_assert!(*seq < head, "retained newest mapping must be reachable");
                }
            }
        }

        // Unknown hashes are an explicit miss.
        prop_assert!(log.find_by_hash("never-inserted").is_none());
    }

    /// Lifetime counters reconcile with the retained window.
    #[test]
    fn counters_reconcile(capacity in arb_capacity(), n in 0usize..=300) {
        let log = CaptureLog::with_capacity(capacity);

        for i in 0..n as u64 {
            log.add(test_entry(i, format!("hash-{}", i)));
        }

        let stats = log.stats();
        prop_assert_eq!(stats.total_inserted as usize, n);
        prop_assert_eq!(
            stats.total_inserted - stats.total_evicted,
            stats.entries as u64
        );
    }

    /// Reads do not mutate: two passes over the full surface observe the
    /// same state.
    #[test]
    fn reads_are_side_effect_free(capacity in arb_capacity(), n in 0usize..=100) {
        let log = CaptureLog::with_capacity(capacity);

        for i in 0..n as u64 {
            log.add(test_entry(i, format!("hash-{}", i % 7)));
        }

        let before = log.stats();
        for pos in 0..log.row_count() {
            let _ = log.get(pos);
        }
        for c in 0..7 {
            let _ = log.find_by_hash(&format!("hash-{}", c));
        }
        let after = log.stats();

        prop_assert_eq!(before.entries, after.entries);
        prop_assert_eq!(before.index_entries, after.index_entries);
        prop_assert_eq!(before.total_inserted, after.total_inserted);
        prop_assert_eq!(before.total_evicted, after.total_evicted);
    }
}
