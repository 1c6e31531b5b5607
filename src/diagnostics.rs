//! Diagnostic sink shared by every component.
//!
//! Components receive an `Arc<dyn DiagnosticSink>` at construction. The
//! default [`TracingSink`] forwards everything to `tracing`; tests swap in a
//! recording sink. Nothing in the core depends on the sink succeeding.

use std::time::Duration;

use tracing::Level;

pub trait DiagnosticSink: Send + Sync {
    /// Record a log entry at `level`.
    fn log(&self, level: Level, message: &str);

    /// Record the duration and outcome of one logical operation.
    fn record_metric(&self, operation: &str, duration: Duration, success: bool);
}

/// Forwards log entries and metrics to the `tracing` subscriber in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            _ => tracing::trace!("{message}"),
        }
    }

    fn record_metric(&self, operation: &str, duration: Duration, success: bool) {
        tracing::info!(
            target: "social_network::metrics",
            operation,
            elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            status = if success { 0 } else { -1 },
            "metric"
        );
    }
}

/// Metric key for an operation label: everything before the first `(`, so
/// `"GetFriends(memberId=3)"` and `"GetFriends"` aggregate together.
#[must_use]
pub fn metric_key(operation: &str) -> &str {
    let trimmed = operation.trim();
    match trimmed.split_once('(') {
        Some((head, _)) if !head.is_empty() => head.trim_end(),
        _ => trimmed,
    }
}
