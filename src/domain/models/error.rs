use thiserror::Error;

/// Every failure the chat flow can surface. All variants are recoverable;
/// they end up as a chat message or a dismissible notice, never a crash.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("no signed-in user")]
    Unauthenticated,
    #[error("no inference endpoint configured")]
    NotConfigured,
    #[error("the inference request timed out")]
    Timeout,
    #[error("{0}")]
    RemoteFunction(String),
    #[error("the inference response could not be parsed")]
    InvalidResponse,
    #[error("network failure: {0}")]
    Network(String),
    #[error("session storage failure: {0}")]
    Storage(String),
    #[error("not found: {0}")]
    NotFound(String),
}
