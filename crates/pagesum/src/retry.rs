//! Retry and backoff policy for the completion call.
//!
//! Failures are classified into a [`FailureKind`]; the kind picks the
//! backoff curve. [`RetryPolicy::step`] turns one attempt's outcome into a
//! [`Step`] so the summarizer loop only has to act on it.

use crate::error::CompletionError;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Default number of attempts (including the first)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Multiplier for the linear rate-limit backoff
const RATE_LIMIT_FACTOR: u32 = 5;

/// Classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport could not connect.
    Connection,
    /// Transport exceeded its deadline.
    Timeout,
    /// Remote quota exceeded (HTTP 429).
    RateLimited,
    /// Any other API error, including an empty response.
    Api,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Connection => write!(f, "connection failed"),
            FailureKind::Timeout => write!(f, "request timed out"),
            FailureKind::RateLimited => write!(f, "rate limit exceeded"),
            FailureKind::Api => write!(f, "API error"),
        }
    }
}

/// What the caller should do after an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Attempt produced a summary.
    Done(String),
    /// Wait, then try again.
    Retry { kind: FailureKind, wait: Duration },
    /// Last attempt failed; give up without waiting.
    Exhausted { kind: FailureKind },
}

/// Bounded retry policy with per-kind backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_retries: u32,
    /// One backoff time unit.
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt bound and one-second units
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Set the backoff time unit
    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    /// Wait before the attempt following `attempt` (0-based).
    ///
    /// Rate limits back off linearly (`5 * (attempt + 1)` units), everything
    /// else exponentially (`2^attempt` units).
    pub fn backoff(&self, attempt: u32, kind: FailureKind) -> Duration {
        let units = match kind {
            FailureKind::RateLimited => RATE_LIMIT_FACTOR.saturating_mul(attempt.saturating_add(1)),
            FailureKind::Connection | FailureKind::Timeout | FailureKind::Api => {
                1u32.checked_shl(attempt).unwrap_or(u32::MAX)
            }
        };
        self.unit.saturating_mul(units)
    }

    /// True when `attempt` (0-based) is the final one allowed
    pub fn is_last(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) >= self.max_retries
    }

    /// Decide the next step from one attempt's outcome.
    ///
    /// `Ok(Some(text))` with non-blank text is a success; `Ok(None)` or blank
    /// text counts as an API error.
    pub fn step(&self, attempt: u32, outcome: &Result<Option<String>, CompletionError>) -> Step {
        let kind = match outcome {
            Ok(Some(text)) if !text.trim().is_empty() => {
                return Step::Done(text.trim().to_string());
            }
            Ok(_) => FailureKind::Api,
            Err(e) => e.kind(),
        };

        if self.is_last(attempt) {
            Step::Exhausted { kind }
        } else {
            Step::Retry {
                kind,
                wait: self.backoff(attempt, kind),
            }
        }
    }
}

/// Suspends the current task between attempts
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
