#[cfg(test)]
#[path = "lambda_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Answer;
use crate::domain::models::ChatError;
use crate::domain::models::Gateway;
use crate::domain::models::Identity;

const MAX_ATTEMPTS: usize = 3;
const DEFAULT_TIMEOUT_MS: u64 = 30000;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
struct InferenceRequest {
    prompt: String,
    #[serde(rename = "userId")]
    user_id: String,
}

/// The function-gateway envelope: a numeric status code wrapping a
/// string-encoded JSON body that needs a second decode step.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct EnvelopeResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    body: String,
    #[serde(default)]
    error: Option<String>,
}

/// A directly-usable payload carrying its text in `response` or `message`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DirectResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

enum ResponseShape {
    Envelope(EnvelopeResponse),
    Direct(DirectResponse),
}

// The envelope is tried first: its two required fields are what distinguish
// it, while the direct shape is all-optional and would match anything.
fn decode_shape(raw: &str) -> Result<ResponseShape, ChatError> {
    if let Ok(envelope) = serde_json::from_str::<EnvelopeResponse>(raw) {
        return Ok(ResponseShape::Envelope(envelope));
    }

    if let Ok(direct) = serde_json::from_str::<DirectResponse>(raw) {
        return Ok(ResponseShape::Direct(direct));
    }

    return Err(ChatError::InvalidResponse);
}

fn normalize(shape: ResponseShape) -> Result<Answer, ChatError> {
    match shape {
        ResponseShape::Envelope(envelope) => {
            if let Some(error) = &envelope.error {
                if !error.is_empty() {
                    return Err(ChatError::RemoteFunction(error.to_string()));
                }
            }

            let inner = serde_json::from_str::<DirectResponse>(&envelope.body).ok();

            if envelope.status_code >= 400 {
                // Most specific message wins: application error, then raw
                // body, then a generic fallback.
                let message = inner
                    .and_then(|e| return e.error.or(e.message))
                    .filter(|e| return !e.is_empty())
                    .unwrap_or_else(|| {
                        if envelope.body.is_empty() {
                            return "The inference function reported an internal failure"
                                .to_string();
                        }
                        return envelope.body.to_string();
                    });

                return Err(ChatError::RemoteFunction(message));
            }

            if let Some(direct) = inner {
                return normalize_direct(direct);
            }

            return Err(ChatError::InvalidResponse);
        }
        ResponseShape::Direct(direct) => {
            return normalize_direct(direct);
        }
    }
}

fn normalize_direct(direct: DirectResponse) -> Result<Answer, ChatError> {
    if let Some(error) = direct.error {
        if !error.is_empty() {
            return Err(ChatError::RemoteFunction(error));
        }
    }

    if let Some(text) = direct.response.or(direct.message) {
        return Ok(Answer::new(&text));
    }

    return Err(ChatError::InvalidResponse);
}

pub struct Lambda {
    url: String,
    timeout: String,
}

impl Default for Lambda {
    fn default() -> Lambda {
        return Lambda {
            url: Config::get(ConfigKey::InferenceUrl),
            timeout: Config::get(ConfigKey::InferenceTimeout),
        };
    }
}

#[async_trait]
impl Gateway for Lambda {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Inference URL is not defined");
        }
        if self.timeout.parse::<u64>().is_err() {
            bail!("Inference timeout is not a number");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn ask(&self, prompt: &str, user: Option<&Identity>) -> Result<Answer, ChatError> {
        let identity = user.ok_or(ChatError::Unauthenticated)?;
        if self.url.is_empty() {
            return Err(ChatError::NotConfigured);
        }

        let timeout =
            Duration::from_millis(self.timeout.parse::<u64>().unwrap_or(DEFAULT_TIMEOUT_MS));
        let req = InferenceRequest {
            prompt: prompt.to_string(),
            user_id: identity.id.to_string(),
        };

        let mut last_err: Option<reqwest::Error> = None;
        for attempt in 1..=MAX_ATTEMPTS {
            let res = reqwest::Client::new()
                .post(&self.url)
                .json(&req)
                .timeout(timeout)
                .send()
                .await;

            match res {
                Ok(result) => {
                    let raw = result
                        .text()
                        .await
                        .map_err(|err| return ChatError::Network(err.to_string()))?;
                    tracing::debug!(body = raw.as_str(), "Inference response");

                    return normalize(decode_shape(&raw)?);
                }
                Err(err) => {
                    if err.is_timeout() {
                        tracing::error!(attempt = attempt, "Inference request timed out");
                        return Err(ChatError::Timeout);
                    }

                    tracing::warn!(attempt = attempt, error = ?err, "Inference request failed");
                    last_err = Some(err);
                }
            }
        }

        return Err(ChatError::Network(
            last_err
                .map(|e| return e.to_string())
                .unwrap_or_else(|| return "inference endpoint unreachable".to_string()),
        ));
    }
}
