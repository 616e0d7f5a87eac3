//! Retry-governed summarization client

use crate::completion::CompletionApi;
use crate::error::{CompletionError, SummarizeError};
use crate::retry::{RetryPolicy, Sleep, Step, TokioSleep};
use crate::types::{CompletionRequest, SummaryRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default output cap in tokens
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Model parameters and retry policy for a [`Summarizer`]
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub policy: RetryPolicy,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            policy: RetryPolicy::default(),
        }
    }
}

/// Produces short summaries through a [`CompletionApi`], retrying transient
/// failures according to its [`RetryPolicy`]
#[derive(Clone)]
pub struct Summarizer {
    api: Arc<dyn CompletionApi>,
    sleeper: Arc<dyn Sleep>,
    options: SummarizerOptions,
}

impl Summarizer {
    pub fn new(api: Arc<dyn CompletionApi>, options: SummarizerOptions) -> Self {
        Self {
            api,
            sleeper: Arc::new(TokioSleep),
            options,
        }
    }

    /// Replace how backoff waits are performed
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleep>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn options(&self) -> &SummarizerOptions {
        &self.options
    }

    /// Summarize `text` in a few sentences.
    ///
    /// Blank input fails with [`SummarizeError::EmptyInput`] before any call
    /// is made. Otherwise up to `max_retries` attempts are made.
    pub async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let request = SummaryRequest::new(text)?;
        let body = CompletionRequest {
            model: self.options.model.clone(),
            messages: request.messages(),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };
        let policy = self.options.policy;

        for attempt in 0..policy.max_retries {
            let outcome = self.api.complete(&body).await;
            match policy.step(attempt, &outcome) {
                Step::Done(summary) => {
                    debug!(attempt, chars = summary.len(), "Summary received");
                    return Ok(summary);
                }
                Step::Retry { kind, wait } => {
                    let error = failure(outcome);
                    warn!(
                        attempt,
                        %kind,
                        wait_secs = wait.as_secs_f64(),
                        %error,
                        "Completion attempt failed, retrying"
                    );
                    self.sleeper.sleep(wait).await;
                }
                Step::Exhausted { kind } => {
                    return Err(SummarizeError::Exhausted {
                        kind,
                        attempts: policy.max_retries,
                        source: failure(outcome),
                    });
                }
            }
        }

        Err(SummarizeError::NoSummary)
    }
}

/// The error behind a failed attempt; content-less answers count as empty responses
fn failure(outcome: Result<Option<String>, CompletionError>) -> CompletionError {
    outcome.err().unwrap_or(CompletionError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::FailureKind;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    type Reply = Result<Option<String>, CompletionError>;

    /// Replays scripted replies and counts calls
    struct ScriptedApi {
        replies: Mutex<VecDeque<Reply>>,
        calls: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedApi {
        fn new(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionApi for ScriptedApi {
        async fn complete(&self, request: &CompletionRequest) -> Reply {
            self.calls.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CompletionError::Connection("script exhausted".into())))
        }
    }

    /// Records waits instead of sleeping
    #[derive(Default)]
    struct RecordingSleep {
        waits: Mutex<Vec<Duration>>,
    }

    impl RecordingSleep {
        fn waits(&self) -> Vec<Duration> {
            self.waits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleep for RecordingSleep {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    fn summarizer(api: Arc<ScriptedApi>, max_retries: u32) -> (Summarizer, Arc<RecordingSleep>) {
        let sleeper = Arc::new(RecordingSleep::default());
        let options = SummarizerOptions {
            policy: RetryPolicy::new(max_retries),
            ..Default::default()
        };
        let s = Summarizer::new(api, options).with_sleeper(sleeper.clone());
        (s, sleeper)
    }

    const SEC: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let api = ScriptedApi::new(vec![Ok(Some("unused".into()))]);
        let (s, sleeper) = summarizer(api.clone(), 3);

        for text in ["", "   ", "\n\t "] {
            let result = s.summarize(text).await;
            assert!(matches!(result, Err(SummarizeError::EmptyInput)));
        }
        assert_eq!(api.calls(), 0);
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_first_attempt_success_returns_trimmed_text() {
        let api = ScriptedApi::new(vec![Ok(Some("  A short summary.\n".into()))]);
        let (s, sleeper) = summarizer(api.clone(), 3);

        let summary = s.summarize("Some page text").await.unwrap();
        assert_eq!(summary, "A short summary.");
        assert_eq!(api.calls(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_parameters() {
        let api = ScriptedApi::new(vec![Ok(Some("ok".into()))]);
        let (s, _) = summarizer(api.clone(), 3);

        s.summarize("  page text  ").await.unwrap();
        let calls = api.calls.lock().unwrap();
        let req = &calls[0];
        assert_eq!(req.model, DEFAULT_MODEL);
        assert_eq!(req.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(req.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].content, crate::types::SYSTEM_PROMPT);
        assert_eq!(req.messages[1].content, "page text");
    }

    #[tokio::test]
    async fn test_connection_errors_back_off_exponentially() {
        let api = ScriptedApi::new(vec![
            Err(CompletionError::Connection("refused".into())),
            Err(CompletionError::Connection("refused".into())),
            Ok(Some("Recovered.".into())),
        ]);
        let (s, sleeper) = summarizer(api.clone(), 3);

        let summary = s.summarize("text").await.unwrap();
        assert_eq!(summary, "Recovered.");
        assert_eq!(api.calls(), 3);
        assert_eq!(sleeper.waits(), vec![SEC, 2 * SEC]);
        assert_eq!(sleeper.waits().iter().sum::<Duration>(), 3 * SEC);
    }

    #[tokio::test]
    async fn test_rate_limits_exhaust_without_final_wait() {
        let replies = (0..4)
            .map(|_| Err(CompletionError::RateLimited("quota".into())))
            .collect();
        let api = ScriptedApi::new(replies);
        let (s, sleeper) = summarizer(api.clone(), 4);

        let err = s.summarize("text").await.unwrap_err();
        match err {
            SummarizeError::Exhausted {
                kind,
                attempts,
                source,
            } => {
                assert_eq!(kind, FailureKind::RateLimited);
                assert_eq!(attempts, 4);
                assert!(matches!(source, CompletionError::RateLimited(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(api.calls(), 4);
        // One wait per non-final attempt: 5*(attempt+1)
        assert_eq!(sleeper.waits(), vec![5 * SEC, 10 * SEC, 15 * SEC]);
    }

    #[tokio::test]
    async fn test_empty_content_is_retried_as_api_error() {
        let api = ScriptedApi::new(vec![
            Ok(None),
            Ok(Some("   ".into())),
            Ok(Some("Finally.".into())),
        ]);
        let (s, sleeper) = summarizer(api.clone(), 3);

        assert_eq!(s.summarize("text").await.unwrap(), "Finally.");
        assert_eq!(sleeper.waits(), vec![SEC, 2 * SEC]);
    }

    #[tokio::test]
    async fn test_persistent_empty_content_fails() {
        let api = ScriptedApi::new(vec![Ok(None), Ok(None)]);
        let (s, _) = summarizer(api.clone(), 2);

        let err = s.summarize("text").await.unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::Exhausted {
                kind: FailureKind::Api,
                attempts: 2,
                source: CompletionError::EmptyResponse,
            }
        ));
    }

    #[tokio::test]
    async fn test_mixed_failures_pick_backoff_per_kind() {
        let api = ScriptedApi::new(vec![
            Err(CompletionError::Timeout("slow".into())),
            Err(CompletionError::RateLimited("quota".into())),
            Err(CompletionError::from_status(500, "boom".into())),
            Ok(Some("Done.".into())),
        ]);
        let (s, sleeper) = summarizer(api.clone(), 5);

        assert_eq!(s.summarize("text").await.unwrap(), "Done.");
        assert_eq!(sleeper.waits(), vec![SEC, 10 * SEC, 4 * SEC]);
    }

    #[tokio::test]
    async fn test_zero_attempts_yields_no_summary() {
        let api = ScriptedApi::new(vec![]);
        let (s, _) = summarizer(api.clone(), 0);

        let err = s.summarize("text").await.unwrap_err();
        assert!(matches!(err, SummarizeError::NoSummary));
        assert_eq!(api.calls(), 0);
    }
}
