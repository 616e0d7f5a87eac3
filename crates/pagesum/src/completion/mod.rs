//! Completion API clients
//!
//! The summarizer talks to the model through [`CompletionApi`]; one call is
//! one attempt. [`OpenAiClient`] speaks the OpenAI chat-completions protocol.

mod openai;

pub use openai::{OpenAiClient, DEFAULT_BASE_URL, DEFAULT_COMPLETION_TIMEOUT};

use crate::error::CompletionError;
use crate::types::CompletionRequest;
use async_trait::async_trait;

/// A remote chat-completion endpoint
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Send one request.
    ///
    /// `Ok(None)` means the API answered but produced no content.
    async fn complete(&self, request: &CompletionRequest)
        -> Result<Option<String>, CompletionError>;
}
