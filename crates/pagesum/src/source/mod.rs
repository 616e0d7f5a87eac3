//! Text sources
//!
//! A [`TextSource`] turns a URL into the plain text that gets summarized.
//! [`HttpTextSource`] is the built-in implementation; tests and embedders can
//! supply their own.

mod http;

pub use http::{HttpTextSource, DEFAULT_FETCH_TIMEOUT, MAX_BODY_BYTES};

use crate::error::FetchError;
use async_trait::async_trait;
use url::Url;

/// Retrieves the visible text behind a URL
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Fetch `url` and return its extracted text.
    ///
    /// Returns [`FetchError::EmptyText`] when nothing readable remains.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Validate a user-supplied URL and return it trimmed.
///
/// Only `http://` and `https://` URLs are accepted.
pub fn validate_url(url: &str) -> Result<&str, FetchError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(FetchError::MissingUrl);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(FetchError::InvalidUrlScheme);
    }

    Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    Ok(url)
}
