//! Leveled diagnostic sink.
//!
//! Write-only channel for store and recorder diagnostics. Messages pass a
//! minimum-level filter and are forwarded to the `log` facade; the host
//! application owns the actual logger implementation. The store never
//! depends on this channel for correctness.

use log::{debug, error, info, warn};
use std::str::FromStr;

/// Severity of a diagnostic message.
///
/// `Always` bypasses the configured minimum level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagLevel {
    Debug,
    Info,
    Warn,
    Error,
    Always,
}

impl FromStr for DiagLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(DiagLevel::Debug),
            "INFO" => Ok(DiagLevel::Info),
            "WARN" => Ok(DiagLevel::Warn),
            "ERROR" => Ok(DiagLevel::Error),
            "ALWAYS" => Ok(DiagLevel::Always),
            other => Err(format!("unknown diagnostic level: {}", other)),
        }
    }
}

impl std::fmt::Display for DiagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiagLevel::Debug => "DEBUG",
            DiagLevel::Info => "INFO",
            DiagLevel::Warn => "WARN",
            DiagLevel::Error => "ERROR",
            DiagLevel::Always => "ALWAYS",
        };
        write!(f, "{}", s)
    }
}

/// Environment variable holding the runtime minimum-level override.
pub const DIAG_LEVEL_ENV: &str = "LEDGER_DIAG_LEVEL";

/// Minimum-level configuration for the sink.
///
/// Resolution order: explicit runtime override, then the packaged
/// configuration value, otherwise the sink is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiagConfig {
    /// Explicit runtime override (e.g. from `LEDGER_DIAG_LEVEL`)
    pub override_level: Option<DiagLevel>,
    /// Value shipped in the embedding application's packaged configuration
    pub packaged_level: Option<DiagLevel>,
}

impl DiagConfig {
    /// Build a config from the environment override plus a packaged value.
    ///
    /// An unparseable environment value is an error rather than a silent
    /// fallback.
    pub fn from_env(packaged_level: Option<DiagLevel>) -> Result<Self, String> {
        let override_level = match std::env::var(DIAG_LEVEL_ENV) {
            Ok(raw) => Some(
                raw.parse::<DiagLevel>()
                    .map_err(|e| format!("invalid {}: {}", DIAG_LEVEL_ENV, e))?,
            ),
            Err(_) => None,
        };

        Ok(DiagConfig {
            override_level,
            packaged_level,
        })
    }

    /// Effective minimum level; `None` means the sink is disabled.
    pub fn resolve(&self) -> Option<DiagLevel> {
        self.override_level.or(self.packaged_level)
    }
}

/// Level-filtered forwarder onto the `log` facade.
#[derive(Clone, Debug)]
pub struct DiagSink {
    min_level: Option<DiagLevel>,
}

impl DiagSink {
    pub fn new(config: DiagConfig) -> Self {
        DiagSink {
            min_level: config.resolve(),
        }
    }

    /// Fully disabled sink. Drops everything, `Always` included: with no
    /// configured minimum there is no filter to bypass.
    pub fn disabled() -> Self {
        DiagSink { min_level: None }
    }

    /// Whether a message at `level` would be emitted.
    pub fn enabled(&self, level: DiagLevel) -> bool {
        match self.min_level {
            Some(min) => level == DiagLevel::Always || level >= min,
            None => false,
        }
    }

    /// Emit a message at the given level.
    pub fn log(&self, level: DiagLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }

        match level {
            DiagLevel::Debug => debug!("{}", message),
            DiagLevel::Info => info!("{}", message),
            DiagLevel::Warn => warn!("{}", message),
            DiagLevel::Error => error!("{}", message),
            DiagLevel::Always => info!("{}", message),
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(DiagLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(DiagLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(DiagLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(DiagLevel::Error, message);
    }

    pub fn always(&self, message: &str) {
        self.log(DiagLevel::Always, message);
    }
}
