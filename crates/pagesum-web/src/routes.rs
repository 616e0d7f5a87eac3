//! HTTP routes

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pagesum::{validate_url, PageSummarizer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPT_JS: &str = include_str!("../static/script.js");

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<PageSummarizer>,
}

/// Body of `POST /summarize`
#[derive(Debug, Deserialize)]
pub struct SummarizeBody {
    #[serde(default)]
    pub url: String,
}

/// Reply of `POST /summarize`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SummarizeReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummarizeReply {
    fn ok(url: String, summary: String) -> Self {
        Self {
            success: true,
            url: Some(url),
            summary: Some(summary),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            summary: None,
            error: Some(error.into()),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/script.js", get(script))
        .route("/summarize", post(summarize))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

async fn summarize(
    State(state): State<AppState>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return reply(
                StatusCode::BAD_REQUEST,
                SummarizeReply::failed(rejection.body_text()),
            );
        }
    };

    let url = match validate_url(&body.url) {
        Ok(url) => url.to_string(),
        Err(e) => return reply(StatusCode::BAD_REQUEST, SummarizeReply::failed(e.to_string())),
    };

    match state.summarizer.summarize_page(&url).await {
        Ok(page) => {
            info!(url = %page.url, "Summarized page");
            reply(StatusCode::OK, SummarizeReply::ok(page.url, page.summary))
        }
        Err(e) => {
            error!(url = %url, error = %e, "Summarization failed");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                SummarizeReply::failed(e.to_string()),
            )
        }
    }
}

fn reply(status: StatusCode, body: SummarizeReply) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use pagesum::{
        CompletionApi, CompletionError, CompletionRequest, FetchError, Summarizer,
        SummarizerOptions, TextSource,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct FakeSource {
        fail: bool,
    }

    #[async_trait]
    impl TextSource for FakeSource {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
            if self.fail {
                Err(FetchError::HttpStatus(502))
            } else {
                Ok("Some article text.".to_string())
            }
        }
    }

    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionApi for CountingApi {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<Option<String>, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some("A concise summary.".to_string()))
        }
    }

    fn app(fail_fetch: bool) -> (Router, Arc<CountingApi>) {
        let api = Arc::new(CountingApi::default());
        let summarizer = Summarizer::new(api.clone(), SummarizerOptions::default());
        let pipeline = PageSummarizer::new(Arc::new(FakeSource { fail: fail_fetch }), summarizer);
        let state = AppState {
            summarizer: Arc::new(pipeline),
        };
        (router(state), api)
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/summarize")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let (app, api) = app(false);
        let (status, json) = post_json(app, r#"{"url": " https://example.com "}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["summary"], "A concise summary.");
        assert!(json.get("error").is_none());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_is_bad_request() {
        let (app, api) = app(false);
        let (status, json) = post_json(app, r#"{"url": "not-a-url"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "Invalid URL: must start with http:// or https://"
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_url_is_bad_request() {
        let (app, api) = app(false);
        let (status, json) = post_json(app, r#"{"url": "   "}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing required parameter: url");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_url_field_is_bad_request() {
        let (app, _) = app(false);
        let (status, json) = post_json(app, "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, api) = app(false);
        let (status, json) = post_json(app, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_server_error() {
        let (app, api) = app(true);
        let (status, json) = post_json(app, r#"{"url": "https://example.com"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "Failed to load page: HTTP error: status 502"
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_index_page() {
        let (app, _) = app(false);
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("summarizeForm"));
        assert!(html.contains("/static/script.js"));
    }

    #[tokio::test]
    async fn test_script_served() {
        let (app, _) = app(false);
        let request = Request::builder()
            .uri("/static/script.js")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_get_summarize_not_allowed() {
        let (app, _) = app(false);
        let request = Request::builder()
            .uri("/summarize")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
