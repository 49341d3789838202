use super::LogLine;
use super::MetricsSnapshot;

/// Payload of the shared reporting channel. Background workers push these;
/// the orchestrator folds them into display state.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    MetricsUpdated(MetricsSnapshot),
    LogsUpdated(Vec<LogLine>),
    Notice(String),
}
