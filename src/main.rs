//! # Capture Ledger Soak
//!
//! Demo executable that drives the capture recorder with synthetic scan
//! traffic well past the retention ceiling, with the background stats
//! reporter running, then prints final statistics.

use ledger::{
    CaptureMonitor, CaptureRecorder, DetectionState, MonitorConfig, ObservedTraffic,
    RecorderConfig,
};
use std::sync::Arc;
use std::time::Duration;

fn synthetic_event(i: u64) -> ObservedTraffic {
    let body = b"action=probe".to_vec();
    ObservedTraffic {
        source_label: "scanner".to_string(),
        service_origin: "https://target.example:443".to_string(),
        http_method: if i % 3 == 0 { "POST" } else { "GET" }.to_string(),
        // Every 10th event repeats an earlier path, producing hash
        // duplicates.
        path: format!("/api/resource/{}", if i % 10 == 0 { i / 10 } else { i }),
        detection_state: if i % 97 == 0 {
            DetectionState::Flagged
        } else {
            DetectionState::Pending
        },
        request: body,
        response: vec![b'x'; 256],
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=================================================");
    println!("  Capture Ledger - Synthetic Ingest Soak         ");
    println!("=================================================");
    println!();

    let recorder = match CaptureRecorder::new(RecorderConfig::default()) {
        Ok(recorder) => Arc::new(recorder),
        Err(e) => {
            eprintln!("Failed to initialize recorder: {}", e);
            return Err(e.into());
        }
    };
    println!("Recorder initialized");
    println!("  - Scan id: {}", recorder.scan_id());
    println!("  - Capacity: {}", recorder.log().capacity());
    println!();

    // Background stats reporter, 5-second interval for the soak
    let monitor = Arc::new(CaptureMonitor::new(
        recorder.log(),
        MonitorConfig {
            report_interval: Duration::from_secs(5),
            enabled: true,
        },
    ));
    tokio::spawn(Arc::clone(&monitor).start());

    // Ingest 2.5x capacity
    let total = (recorder.log().capacity() as u64) * 5 / 2;
    println!("Ingesting {} synthetic events...", total);
    for i in 0..total {
        recorder.record(synthetic_event(i));
    }
    println!("Ingest complete");
    println!();

    let stats = recorder.stats();
    println!("Recorder Statistics:");
    println!("  - Events seen: {}", stats.total_seen);
    println!("  - Events recorded: {}", stats.total_recorded);
    println!("  - Duplicate hashes: {}", stats.duplicate_hashes);
    println!("  - Duplicate rate: {:.2}%", stats.duplicate_rate() * 100.0);
    println!();
    println!("Store Statistics:");
    println!(
        "  - Retained: {}/{} entries",
        stats.store.entries, stats.store.capacity
    );
    println!("  - Indexed hashes: {}", stats.store.index_entries);
    println!("  - Total inserted: {}", stats.store.total_inserted);
    println!("  - Total evicted: {}", stats.store.total_evicted);
    println!();

    // Oldest and newest retained entries
    let log = recorder.log();
    let oldest = log.get(0)?;
    let newest = log.get(log.row_count() - 1)?;
    println!("Retention window:");
    println!("  - Oldest retained id: {}", oldest.id);
    println!("  - Newest retained id: {}", newest.id);

    println!();
    println!("=================================================");
    println!("  Soak Complete");
    println!("=================================================");

    Ok(())
}
