use thiserror::Error;

/// Failure taxonomy for a single notifier run.
///
/// Only the first four variants abort the run. `Dispatch` failures are
/// handled per offer inside the announcement loop: the offer is logged,
/// left out of the sent state and retried on the next invocation.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("catalog request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected catalog response shape: {0}")]
    MalformedResponse(String),
    #[error("failed to persist sent state: {0}")]
    State(#[from] std::io::Error),
    #[error("telegram dispatch failed: {0}")]
    Dispatch(String),
}
