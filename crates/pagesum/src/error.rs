//! Error types for PageSum

use crate::retry::FailureKind;
use thiserror::Error;

/// Errors that can occur while retrieving page text
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Page had no visible text after extraction
    #[error("No text could be extracted from the page")]
    EmptyText,
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout { secs: timeout_secs }
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::RequestError(err.to_string())
        }
    }

    /// True for errors caused by the URL itself rather than the transport
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FetchError::MissingUrl | FetchError::InvalidUrlScheme | FetchError::InvalidUrl(_)
        )
    }
}

/// Failure of a single call to the completion API
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport could not connect
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transport exceeded its deadline
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Remote quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other API-level error
    #[error("API error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// API answered without any content
    #[error("Empty response from API")]
    EmptyResponse,
}

impl CompletionError {
    /// Classify a transport error from reqwest
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout(err.to_string())
        } else if err.is_connect() {
            CompletionError::Connection(err.to_string())
        } else {
            CompletionError::Api {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }

    /// Classify a non-success HTTP status with its response body
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 429 {
            CompletionError::RateLimited(body)
        } else {
            CompletionError::Api {
                status: Some(status),
                message: body,
            }
        }
    }

    /// Failure kind used to pick the backoff
    pub fn kind(&self) -> FailureKind {
        match self {
            CompletionError::Connection(_) => FailureKind::Connection,
            CompletionError::Timeout(_) => FailureKind::Timeout,
            CompletionError::RateLimited(_) => FailureKind::RateLimited,
            CompletionError::Api { .. } | CompletionError::EmptyResponse => FailureKind::Api,
        }
    }
}

/// Errors returned by the summarization client
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Input text was empty or whitespace only
    #[error("Text to summarize must not be empty")]
    EmptyInput,

    /// Every attempt failed
    #[error("{kind} after {attempts} attempts: {source}")]
    Exhausted {
        kind: FailureKind,
        attempts: u32,
        #[source]
        source: CompletionError,
    },

    /// Loop finished without producing a result
    #[error("No summary after all attempts")]
    NoSummary,
}

/// Configuration problems detected before any request is made
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found: set OPENAI_API_KEY or pass it explicitly")]
    MissingApiKey,

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Failed to create completion HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Top-level error for the page pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load page: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to summarize: {0}")]
    Summarize(#[from] SummarizeError),
}

impl Error {
    /// True when the caller supplied bad input; never retried
    pub fn is_validation(&self) -> bool {
        match self {
            Error::Fetch(e) => e.is_validation(),
            Error::Summarize(SummarizeError::EmptyInput) => true,
            _ => false,
        }
    }
}
