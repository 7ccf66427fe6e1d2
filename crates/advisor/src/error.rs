use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("no API key configured for the advisor")]
    MissingApiKey,
}
