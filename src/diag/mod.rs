//! Diagnostic channel for the capture pipeline.
//!
//! Level-filtered, write-only message sink consumed by the recorder and
//! monitor. See [`sink::DiagSink`].

pub mod sink;

pub use sink::{DiagConfig, DiagLevel, DiagSink, DIAG_LEVEL_ENV};
