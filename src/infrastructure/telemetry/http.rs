#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::LogEvent;
use crate::domain::models::MetricPoint;
use crate::domain::models::TelemetrySource;

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
struct MetricQuery {
    metric: String,
    start: i64,
    end: i64,
    period: i64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MetricSeries {
    datapoints: Vec<MetricPoint>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
struct LogQuery {
    #[serde(rename = "logGroup")]
    log_group: String,
    start: i64,
    end: i64,
    limit: usize,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LogBatch {
    events: Vec<LogEvent>,
}

pub struct HttpTelemetry {
    url: String,
    log_group: String,
}

impl Default for HttpTelemetry {
    fn default() -> HttpTelemetry {
        return HttpTelemetry {
            url: Config::get(ConfigKey::TelemetryUrl),
            log_group: Config::get(ConfigKey::LogGroup),
        };
    }
}

impl HttpTelemetry {
    pub fn new(url: String, log_group: String) -> HttpTelemetry {
        return HttpTelemetry { url, log_group };
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetry {
    #[allow(clippy::implicit_return)]
    async fn query_metric(
        &self,
        metric: &str,
        start_ms: i64,
        end_ms: i64,
        period_secs: i64,
    ) -> Result<Vec<MetricPoint>> {
        if self.url.is_empty() {
            bail!("Telemetry URL is not defined");
        }

        let req = MetricQuery {
            metric: metric.to_string(),
            start: start_ms,
            end: end_ms,
            period: period_secs,
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/metrics/query", url = self.url))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                metric = metric,
                "Metric query failed"
            );
            bail!("Metric query failed");
        }

        let series = res.json::<MetricSeries>().await?;
        return Ok(series.datapoints);
    }

    #[allow(clippy::implicit_return)]
    async fn query_logs(&self, start_ms: i64, end_ms: i64, limit: usize) -> Result<Vec<LogEvent>> {
        if self.url.is_empty() {
            bail!("Telemetry URL is not defined");
        }

        let req = LogQuery {
            log_group: self.log_group.to_string(),
            start: start_ms,
            end: end_ms,
            limit,
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/logs/query", url = self.url))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Log query failed");
            bail!("Log query failed");
        }

        let batch = res.json::<LogBatch>().await?;
        return Ok(batch.events);
    }
}
