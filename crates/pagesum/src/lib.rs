//! PageSum - fetch a web page and summarize it with an LLM
//!
//! The crate has three layers:
//!
//! - [`TextSource`] retrieves a page and extracts its visible text
//!   ([`HttpTextSource`] is the built-in implementation).
//! - [`Summarizer`] asks a [`CompletionApi`] for a 3-5 sentence summary,
//!   retrying transient failures according to a [`RetryPolicy`].
//! - [`PageSummarizer`] chains the two for a single URL.
//!
//! ```no_run
//! # async fn run() -> Result<(), pagesum::Error> {
//! let config = pagesum::Config::new("sk-...");
//! let page = pagesum::summarize_page("https://example.com", &config).await?;
//! println!("{}", page.summary);
//! # Ok(())
//! # }
//! ```

pub mod completion;
mod config;
mod convert;
mod error;
mod pipeline;
pub mod retry;
pub mod source;
mod summarizer;
mod types;

pub use completion::{CompletionApi, OpenAiClient};
pub use config::{Config, DEFAULT_MAX_CHARS};
pub use convert::{collapse_whitespace, html_to_text};
pub use error::{CompletionError, ConfigError, Error, FetchError, SummarizeError};
pub use pipeline::{summarize_page, PageSummarizer};
pub use retry::{FailureKind, RetryPolicy, Sleep, Step, TokioSleep};
pub use source::{validate_url, HttpTextSource, TextSource};
pub use summarizer::{
    Summarizer, SummarizerOptions, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
pub use types::{
    ChatMessage, CompletionRequest, PageSummary, Role, SummaryRequest, SYSTEM_PROMPT,
};

/// Default User-Agent string for page requests
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) PageSum/1.0";
