//! Page summarization pipeline
//!
//! Main entry points: fetch a page's text, cap its length and hand it to the
//! [`Summarizer`]. Page retrieval is never retried.

use crate::completion::{CompletionApi, OpenAiClient};
use crate::config::{Config, DEFAULT_MAX_CHARS};
use crate::error::Error;
use crate::source::{validate_url, HttpTextSource, TextSource};
use crate::summarizer::Summarizer;
use crate::types::PageSummary;
use std::sync::Arc;
use tracing::info;

/// Suffix appended to text cut at the character limit
const TRUNCATION_MARKER: &str = "...";

/// Fetches pages and summarizes their text
#[derive(Clone)]
pub struct PageSummarizer {
    source: Arc<dyn TextSource>,
    summarizer: Summarizer,
    max_chars: usize,
}

impl PageSummarizer {
    /// Assemble a pipeline from its parts
    pub fn new(source: Arc<dyn TextSource>, summarizer: Summarizer) -> Self {
        Self {
            source,
            summarizer,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Build the HTTP source and OpenAI client described by `config`
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let source = HttpTextSource::with_options(&config.user_agent, config.fetch_timeout)?;
        let api: Arc<dyn CompletionApi> = Arc::new(OpenAiClient::with_options(
            &config.api_key,
            &config.base_url,
            config.completion_timeout,
        )?);
        let summarizer = Summarizer::new(api, config.summarizer_options());

        Ok(Self::new(Arc::new(source), summarizer).with_max_chars(config.max_chars))
    }

    /// Set the character limit for text sent to the model
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Fetch `url` and return a short summary of its text
    pub async fn summarize_page(&self, url: &str) -> Result<PageSummary, Error> {
        let url = validate_url(url)?;

        info!(url, source = self.source.name(), "Fetching page");
        let text = self.source.fetch_text(url).await?;

        let (text, truncated) = truncate_chars(&text, self.max_chars);
        if truncated {
            info!(max_chars = self.max_chars, "Text truncated");
        }
        let text_chars = text.chars().count();

        info!(chars = text_chars, "Summarizing text");
        let summary = self.summarizer.summarize(&text).await?;
        info!(url, "Summary ready");

        Ok(PageSummary {
            url: url.to_string(),
            summary,
            text_chars,
            truncated,
        })
    }
}

/// Fetch and summarize a single page using `config`
pub async fn summarize_page(url: &str, config: &Config) -> Result<PageSummary, Error> {
    PageSummarizer::from_config(config)?.summarize_page(url).await
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`
fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER), true),
        None => (text.to_string(), false),
    }
}
