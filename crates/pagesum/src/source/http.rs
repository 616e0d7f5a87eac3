//! HTTP text source
//!
//! Downloads a page with a browser-like User-Agent and extracts its visible
//! text. Non-HTML bodies are passed through with whitespace collapsed.

use crate::convert::{collapse_whitespace, html_to_text, is_html};
use crate::error::FetchError;
use crate::source::{validate_url, TextSource};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bodies larger than this are cut off
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Fetches pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpTextSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTextSource {
    /// Create a source with the default timeout and User-Agent
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(DEFAULT_USER_AGENT, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a source with a custom User-Agent and timeout
    pub fn with_options(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, text/plain, */*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        Ok(Self { client, timeout })
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl TextSource for HttpTextSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let url = validate_url(url)?;
        let timeout_secs = self.timeout.as_secs();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = read_body_capped(response, MAX_BODY_BYTES, timeout_secs).await?;
        let content = String::from_utf8_lossy(&body);

        let text = if is_html(content_type.as_deref(), &content) {
            html_to_text(&content)
        } else {
            collapse_whitespace(&content)
        };

        debug!(url, bytes = body.len(), chars = text.chars().count(), "Extracted page text");

        if text.is_empty() {
            return Err(FetchError::EmptyText);
        }
        Ok(text)
    }
}

/// Read the response body, stopping once `limit` bytes have arrived
async fn read_body_capped(
    response: reqwest::Response,
    limit: usize,
    timeout_secs: u64,
) -> Result<Bytes, FetchError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::from_reqwest(e, timeout_secs))?;
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            warn!(limit, "Body limit reached, ignoring the rest of the page");
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(body))
}
