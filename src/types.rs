//! Core types for captured scan traffic.
//!
//! Defines the immutable capture record, the producer-side observation
//! struct, and content fingerprinting.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Analysis state of a captured traffic event.
///
/// Opaque to the store; carried through unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionState {
    /// Captured, not yet analyzed
    Pending,
    /// Flagged by a passive or active check
    Flagged,
    /// Finding confirmed by an analyst
    Confirmed,
    /// Reviewed and dismissed
    FalsePositive,
}

impl std::fmt::Display for DetectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DetectionState::Pending => "PENDING",
            DetectionState::Flagged => "FLAGGED",
            DetectionState::Confirmed => "CONFIRMED",
            DetectionState::FalsePositive => "FALSE_POSITIVE",
        };
        write!(f, "{}", s)
    }
}

/// Raw request/response bytes for one captured exchange.
///
/// Opaque payload; the store never inspects or mutates it.
#[derive(Clone, Debug, Default)]
pub struct RequestArtifact {
    pub request: Vec<u8>,
    pub response: Vec<u8>,
}

impl RequestArtifact {
    pub fn total_size(&self) -> u64 {
        (self.request.len() + self.response.len()) as u64
    }
}

/// One observed traffic event as handed over by the scan pipeline,
/// before an id and fingerprint have been assigned.
#[derive(Clone, Debug)]
pub struct ObservedTraffic {
    /// Which tool surfaced the event (proxy, scanner, repeater, ...)
    pub source_label: String,
    /// Scheme://host:port of the target service
    pub service_origin: String,
    pub http_method: String,
    pub path: String,
    pub detection_state: DetectionState,
    pub request: Vec<u8>,
    pub response: Vec<u8>,
}

/// An immutable capture record held by the log.
///
/// Created once by the producer; the store never mutates a stored entry.
#[derive(Clone, Debug)]
pub struct CaptureEntry {
    /// Monotonically increasing, producer-assigned. Identity and ordering
    /// only; never used for indexing.
    pub id: u64,
    /// Hex digest identifying the logical content. Not unique a priori.
    pub content_hash: String,
    pub source_label: String,
    pub detection_state: DetectionState,
    /// Combined request + response size in bytes
    pub size: u64,
    pub service_origin: String,
    pub http_method: String,
    pub path: String,
    /// Shared raw bytes of the original exchange
    pub artifact: Arc<RequestArtifact>,
}

impl CaptureEntry {
    /// Build an entry from an observation, with the given id and hash.
    pub fn from_observed(id: u64, content_hash: String, observed: ObservedTraffic) -> Self {
        let artifact = RequestArtifact {
            request: observed.request,
            response: observed.response,
        };
        CaptureEntry {
            id,
            content_hash,
            source_label: observed.source_label,
            detection_state: observed.detection_state,
            size: artifact.total_size(),
            service_origin: observed.service_origin,
            http_method: observed.http_method,
            path: observed.path,
            artifact: Arc::new(artifact),
        }
    }

    /// Serializable summary used in diagnostic detail lines.
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            content_hash: self.content_hash.clone(),
            source_label: self.source_label.clone(),
            detection_state: self.detection_state,
            size: self.size,
            service_origin: self.service_origin.clone(),
            http_method: self.http_method.clone(),
            path: self.path.clone(),
        }
    }
}

/// JSON-friendly projection of a capture entry (payload bytes excluded).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: u64,
    pub content_hash: String,
    pub source_label: String,
    pub detection_state: DetectionState,
    pub size: u64,
    pub service_origin: String,
    pub http_method: String,
    pub path: String,
}

/// Compute the content fingerprint for an exchange: SHA-256 over method,
/// path and request body, hex-encoded.
///
/// Producers are free to supply their own digest instead; the store treats
/// the hash as an opaque string key.
pub fn fingerprint(method: &str, path: &str, request: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(path.as_bytes());
    hasher.update(b"\n");
    hasher.update(request);
    hex::encode(hasher.finalize())
}
