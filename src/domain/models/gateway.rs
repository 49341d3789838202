use anyhow::Result;
use async_trait::async_trait;

use super::Answer;
use super::ChatError;
use super::Identity;

pub type GatewayBox = Box<dyn Gateway + Send + Sync>;

#[async_trait]
pub trait Gateway {
    /// Used at startup to verify all configuration is available to reach the
    /// inference endpoint.
    async fn health_check(&self) -> Result<()>;

    /// Issues exactly one round trip to the inference endpoint and normalizes
    /// whatever shape comes back into an [`Answer`]. Failures map onto the
    /// [`ChatError`] taxonomy and are always recoverable.
    async fn ask(&self, prompt: &str, user: Option<&Identity>) -> Result<Answer, ChatError>;
}
