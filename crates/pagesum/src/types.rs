//! Core types for PageSum

use crate::error::SummarizeError;
use serde::{Deserialize, Serialize};

/// Instruction sent as the system message of every summary request
pub const SYSTEM_PROMPT: &str = "You are an analyst. State the essence of the text in 3-5 sentences. \
Be precise and concise.";

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Validated text plus the fixed summary instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    text: String,
    instruction: &'static str,
}

impl SummaryRequest {
    /// Trim `text`; fails with [`SummarizeError::EmptyInput`] if nothing is left
    pub fn new(text: &str) -> Result<Self, SummarizeError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SummarizeError::EmptyInput);
        }
        Ok(Self {
            text: text.to_string(),
            instruction: SYSTEM_PROMPT,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn instruction(&self) -> &str {
        self.instruction
    }

    /// System instruction followed by the text as the user message
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.instruction),
            ChatMessage::user(self.text.clone()),
        ]
    }
}

/// Body of a chat completion call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Result of summarizing one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    /// The page URL
    pub url: String,

    /// Summary text returned by the model
    pub summary: String,

    /// Number of characters sent for summarization
    pub text_chars: usize,

    /// True if the page text was cut before summarizing
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}
