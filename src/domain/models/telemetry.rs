#[cfg(test)]
#[path = "telemetry_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

pub const METRICS_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;
pub const METRICS_PERIOD_SECS: i64 = 24 * 60 * 60;
pub const LOGS_WINDOW_MS: i64 = 60 * 60 * 1000;
pub const LOGS_LIMIT: usize = 20;
pub const LOG_DISPLAY_WIDTH: usize = 150;

/// Aggregate counters for the trailing metrics window. Replaced wholesale on
/// every poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub errors: u64,
    pub throttles: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogSeverity {
    Error,
    Warn,
    Info,
}

/// One trimmed log line. `display` is bounded for list rendering, `full`
/// backs the tooltip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub display: String,
    pub full: String,
    pub severity: LogSeverity,
}

impl LogLine {
    pub fn parse(raw: &str) -> LogLine {
        let full = raw.trim().to_string();
        let lowered = full.to_lowercase();

        let severity = if lowered.contains("error") {
            LogSeverity::Error
        } else if lowered.contains("warn") {
            LogSeverity::Warn
        } else {
            LogSeverity::Info
        };

        let mut display = full.chars().take(LOG_DISPLAY_WIDTH).collect::<String>();
        if full.chars().count() > LOG_DISPLAY_WIDTH {
            display.push_str("...");
        }

        return LogLine {
            display,
            full,
            severity,
        };
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: i64,
    pub sum: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub message: String,
    pub timestamp: i64,
}

// Arc rather than Box so each poll cycle can hand the source to a spawned
// log fetch.
pub type TelemetrySourceBox = Arc<dyn TelemetrySource + Send + Sync>;

#[async_trait]
pub trait TelemetrySource {
    /// Fetches one aggregate series over `[start_ms, end_ms]` at
    /// `period_secs` granularity. Missing data points are simply absent from
    /// the result.
    async fn query_metric(
        &self,
        metric: &str,
        start_ms: i64,
        end_ms: i64,
        period_secs: i64,
    ) -> Result<Vec<MetricPoint>>;

    /// Fetches the most recent log events within `[start_ms, end_ms]`,
    /// bounded to `limit` entries.
    async fn query_logs(&self, start_ms: i64, end_ms: i64, limit: usize) -> Result<Vec<LogEvent>>;
}
