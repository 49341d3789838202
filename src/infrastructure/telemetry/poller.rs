#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;

use std::time::Duration;

use chrono::Utc;
use futures::try_join;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::domain::models::Event;
use crate::domain::models::LogLine;
use crate::domain::models::MetricPoint;
use crate::domain::models::MetricsSnapshot;
use crate::domain::models::TelemetrySourceBox;
use crate::domain::models::LOGS_LIMIT;
use crate::domain::models::LOGS_WINDOW_MS;
use crate::domain::models::METRICS_PERIOD_SECS;
use crate::domain::models::METRICS_WINDOW_MS;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

fn sum_points(points: &[MetricPoint]) -> u64 {
    return points.iter().map(|e| return e.sum).sum::<f64>() as u64;
}

/// Background poller for aggregate counters and recent log lines. Results
/// flow through the shared event channel; nothing here can fail the chat
/// flow.
pub struct TelemetryPoller {
    source: TelemetrySourceBox,
    tx: mpsc::UnboundedSender<Event>,
    token: CancellationToken,
}

impl TelemetryPoller {
    pub fn new(source: TelemetrySourceBox, tx: mpsc::UnboundedSender<Event>) -> TelemetryPoller {
        return TelemetryPoller {
            source,
            tx,
            token: CancellationToken::new(),
        };
    }

    /// Polls immediately, then on a fixed interval.
    pub async fn run(mut self) {
        let mut interval = time::interval(POLL_INTERVAL);
        loop {
            interval.tick().await;
            self.poll_cycle().await;
        }
    }

    /// One poll cycle: rotates the cancellation token (superseding the
    /// previous cycle's in-flight log fetch), spawns the log fetch under the
    /// fresh token, and joins the metric queries before returning. The
    /// returned handle covers the log fetch only.
    pub async fn poll_cycle(&mut self) -> JoinHandle<()> {
        self.token.cancel();
        self.token = CancellationToken::new();

        let source = self.source.clone();
        let tx = self.tx.clone();
        let token = self.token.clone();
        let logs_worker = tokio::spawn(async move {
            TelemetryPoller::fetch_logs(source, tx, token).await;
        });

        let snapshot = self.fetch_metrics().await;
        if self.tx.send(Event::MetricsUpdated(snapshot)).is_err() {
            tracing::warn!("Telemetry channel closed, dropping metrics snapshot");
        }

        return logs_worker;
    }

    /// Three aggregate queries over the trailing window, run concurrently.
    /// Failure never propagates: the snapshot zeroes out and the failure goes
    /// through the event channel as a notice.
    async fn fetch_metrics(&self) -> MetricsSnapshot {
        let end = Utc::now().timestamp_millis();
        let start = end - METRICS_WINDOW_MS;

        let res = try_join!(
            self.source
                .query_metric("Invocations", start, end, METRICS_PERIOD_SECS),
            self.source
                .query_metric("Errors", start, end, METRICS_PERIOD_SECS),
            self.source
                .query_metric("Throttles", start, end, METRICS_PERIOD_SECS),
        );

        match res {
            Ok((invocations, errors, throttles)) => {
                return MetricsSnapshot {
                    invocations: sum_points(&invocations),
                    errors: sum_points(&errors),
                    throttles: sum_points(&throttles),
                };
            }
            Err(err) => {
                tracing::error!(error = ?err, "Metric queries failed");
                if self
                    .tx
                    .send(Event::Notice(format!("Failed to fetch metrics: {err}")))
                    .is_err()
                {
                    tracing::warn!("Telemetry channel closed, dropping metrics notice");
                }

                return MetricsSnapshot::default();
            }
        }
    }

    async fn fetch_logs(
        source: TelemetrySourceBox,
        tx: mpsc::UnboundedSender<Event>,
        token: CancellationToken,
    ) {
        let end = Utc::now().timestamp_millis();
        let start = end - LOGS_WINDOW_MS;

        let res = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Log fetch superseded by a newer poll cycle");
                return;
            }
            res = source.query_logs(start, end, LOGS_LIMIT) => res,
        };

        // A cycle that began while the query was resolving wins; stale
        // results never touch displayed state.
        if token.is_cancelled() {
            return;
        }

        let lines = match res {
            Ok(events) => {
                if events.is_empty() {
                    vec![LogLine::parse("No recent logs found.")]
                } else {
                    events
                        .iter()
                        .map(|e| return LogLine::parse(&e.message))
                        .collect::<Vec<LogLine>>()
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, "Log query failed");
                vec![LogLine::parse("Error fetching logs.")]
            }
        };

        if tx.send(Event::LogsUpdated(lines)).is_err() {
            tracing::warn!("Telemetry channel closed, dropping log lines");
        }
    }
}
