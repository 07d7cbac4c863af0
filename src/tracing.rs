//! Tracing infrastructure for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=charguard::highlight=trace` - per-token validation
//! - `RUST_LOG=charguard::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `<config dir>/logs/charguard.log` with daily rotation (see
//! [`crate::config::config_dir`]).
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::highlight::HighlightEngine;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`. Console output goes to
/// stderr so it never mixes with rendered markup on stdout.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of engine state for diffing between edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub record_count: usize,
    pub text_len: usize,
    pub invalid_count: usize,
}

impl CacheSnapshot {
    pub fn from_engine(engine: &HighlightEngine) -> Self {
        let cache = engine.node_cache();
        Self {
            record_count: cache.len(),
            text_len: cache.text_len(),
            invalid_count: cache.invalid_count(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &CacheSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.record_count != other.record_count {
            changes.push(format!(
                "records: {} → {}",
                self.record_count, other.record_count
            ));
        }
        if self.text_len != other.text_len {
            changes.push(format!("chars: {} → {}", self.text_len, other.text_len));
        }
        if self.invalid_count != other.invalid_count {
            changes.push(format!(
                "invalid: {} → {}",
                self.invalid_count, other.invalid_count
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_diff_reports_changes() {
        let mut engine = HighlightEngine::default();
        let before = CacheSnapshot::from_engine(&engine);
        engine.process("ab c$");
        let after = CacheSnapshot::from_engine(&engine);
        assert_eq!(
            before.diff(&after).as_deref(),
            Some("records: 0 → 3; chars: 0 → 5; invalid: 0 → 1")
        );
        assert_eq!(after.diff(&after), None);
    }
}
