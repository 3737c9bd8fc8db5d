//! Error model used by Jira API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JiraError>;

/// Failure modes of a Jira request: non-success HTTP status, rejected credentials, timeouts, transport problems and undecodable payloads.
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl JiraError {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        JiraError::Http {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for JiraError {
    /// Converts reqwest errors into semantic JiraError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            JiraError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            JiraError::http(status, err.to_string())
        } else if err.is_connect() {
            JiraError::Network(err.to_string())
        } else if err.is_decode() {
            JiraError::Serialization(err.to_string())
        } else {
            JiraError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for JiraError {
    fn from(err: serde_json::Error) -> Self {
        JiraError::Serialization(err.to_string())
    }
}
