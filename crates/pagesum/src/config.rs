//! Runtime configuration
//!
//! Everything the pipeline needs is carried in an explicit [`Config`] value;
//! front ends fill it from flags and environment variables.

use crate::completion::{DEFAULT_BASE_URL, DEFAULT_COMPLETION_TIMEOUT};
use crate::error::ConfigError;
use crate::retry::{RetryPolicy, DEFAULT_MAX_RETRIES};
use crate::source::DEFAULT_FETCH_TIMEOUT;
use crate::summarizer::{
    SummarizerOptions, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use crate::DEFAULT_USER_AGENT;
use std::fmt;
use std::time::Duration;

/// Default cap on characters sent for summarization
pub const DEFAULT_MAX_CHARS: usize = 8000;

/// Settings for fetching and summarizing pages
#[derive(Clone, PartialEq)]
pub struct Config {
    /// API credential for the completion endpoint
    pub api_key: String,
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Attempts per summary, including the first
    pub max_retries: u32,
    /// One backoff time unit
    pub backoff_unit: Duration,
    pub fetch_timeout: Duration,
    pub completion_timeout: Duration,
    pub user_agent: String,
    /// Page text longer than this is cut before summarizing
    pub max_chars: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("backoff_unit", &self.backoff_unit)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("completion_timeout", &self.completion_timeout)
            .field("user_agent", &self.user_agent)
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

impl Config {
    /// Create a config with defaults for everything but the API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: Duration::from_secs(1),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    /// Model parameters and retry policy for the summarizer
    pub fn summarizer_options(&self) -> SummarizerOptions {
        SummarizerOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            policy: RetryPolicy::new(self.max_retries).with_unit(self.backoff_unit),
        }
    }
}
