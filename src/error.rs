//! Error types for the article fetch pipeline and the preference store.
//!
//! [`FetchError`] covers every way a fetch can fail as a whole. A single
//! malformed search result is not fatal: it is reported as a [`RecordError`],
//! logged, and skipped by the decoder.

use thiserror::Error;

/// Failure of one run of the fetch pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request URL is not a well-formed absolute http(s) URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// Non-200 status or transport failure (DNS, timeout, connection reset).
    #[error("network failure{}: {reason}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    NetworkFailure {
        /// HTTP status code, when the server answered at all.
        status: Option<u16>,
        /// Status reason phrase or the underlying transport error.
        reason: String,
    },

    /// The server answered 200 with an empty body.
    #[error("empty response body")]
    EmptyResponse,

    /// The body is not JSON, or lacks the `response.results` envelope.
    #[error("malformed JSON response: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

impl FetchError {
    /// The HTTP status carried by a [`FetchError::NetworkFailure`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::NetworkFailure { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::NetworkFailure {
            status: e.status().map(|s| s.as_u16()),
            reason: e.to_string(),
        }
    }
}

/// A search result that could not be turned into an article record.
#[derive(Debug, Error)]
#[error("result #{index} skipped: {source}")]
pub struct RecordError {
    /// Position of the result in the `results` array.
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Failure reading or writing the preference file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
