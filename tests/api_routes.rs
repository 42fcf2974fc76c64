//! Integration tests for the HTTP surface.
//!
//! The real router runs in-process with scripted completion and mail providers,
//! so no network access is needed.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use meetmail::{
    api::{build_router, AppState},
    config::Config,
    mail::{Mailer, OutgoingMail},
    summary::{ChatRequest, CompletionProvider, DEFAULT_INSTRUCTION},
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct FakeCompletion {
    reply: Value,
    calls: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    fn name(&self) -> &'static str {
        "fake-completion"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
struct FakeMailer {
    fail: bool,
    sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for FakeMailer {
    fn name(&self) -> &'static str {
        "fake-mailer"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<String> {
        self.sent.lock().unwrap().push(mail.clone());
        if self.fail {
            anyhow::bail!("421 service not available");
        }
        Ok("abc123".to_string())
    }
}

struct Harness {
    app: Router,
    completion: Arc<FakeCompletion>,
    mailer: Arc<FakeMailer>,
}

impl Harness {
    fn new(reply: Value, mail_fails: bool) -> Self {
        Self::with_config(reply, mail_fails, Config::default())
    }

    fn with_config(reply: Value, mail_fails: bool, mut config: Config) -> Self {
        let completion = Arc::new(FakeCompletion {
            reply,
            ..FakeCompletion::default()
        });
        let mailer = Arc::new(FakeMailer {
            fail: mail_fails,
            ..FakeMailer::default()
        });

        config.server.static_dir = "does-not-exist".to_string();

        let state = AppState::new(config, completion.clone(), mailer.clone());
        Self {
            app: build_router(state),
            completion,
            mailer,
        }
    }

    fn with_summary(text: &str) -> Self {
        Self::new(
            json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] }),
            false,
        )
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(path, body.to_string()).await
    }

    async fn post_raw(&self, path: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn completion_calls(&self) -> Vec<ChatRequest> {
        self.completion.calls.lock().unwrap().clone()
    }

    fn sent(&self) -> Vec<OutgoingMail> {
        self.mailer.sent.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn generate_returns_trimmed_summary() {
    let harness = Harness::with_summary("  - X  ");

    let (status, body) = harness
        .post("/api/generate", json!({ "transcript": "Alice: ship it" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "summary": "- X" }));
}

#[tokio::test]
async fn generate_without_transcript_is_bad_request() {
    let harness = Harness::with_summary("unused");

    for payload in [json!({}), json!({ "transcript": "" }), json!({ "transcript": null })] {
        let (status, body) = harness.post("/api/generate", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "ok": false, "error": "Transcript required" }));
    }
    assert!(harness.completion_calls().is_empty());
}

#[tokio::test]
async fn generate_uses_default_instruction() {
    let harness = Harness::with_summary("- X");

    harness
        .post("/api/generate", json!({ "transcript": "Bob: hi" }))
        .await;

    let calls = harness.completion_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].messages[1]
        .content
        .starts_with(&format!("Instruction: {}\n\n", DEFAULT_INSTRUCTION)));
}

#[tokio::test]
async fn generate_accepts_prompt_field() {
    let harness = Harness::with_summary("- X");

    harness
        .post(
            "/api/generate",
            json!({ "transcript": "Bob: hi", "prompt": "Only decisions" }),
        )
        .await;

    assert!(harness.completion_calls()[0].messages[1]
        .content
        .starts_with("Instruction: Only decisions\n\n"));
}

#[tokio::test]
async fn generate_surfaces_upstream_error() {
    let harness = Harness::new(
        json!({
            "error": { "message": "Y" },
            "choices": [{ "message": { "content": "ignored" } }]
        }),
        false,
    );

    let (status, body) = harness
        .post("/api/generate", json!({ "transcript": "t" }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "ok": false, "error": "Y" }));
}

#[tokio::test]
async fn generate_reports_missing_content() {
    let harness = Harness::new(json!({ "id": "chatcmpl-1", "choices": [] }), false);

    let (status, body) = harness
        .post("/api/generate", json!({ "transcript": "t" }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "ok": false, "error": "Groq returned no summary content" })
    );
}

#[tokio::test]
async fn malformed_json_keeps_error_shape() {
    let harness = Harness::with_summary("unused");

    let (status, body) = harness
        .post_raw("/api/generate", "{not json".to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].is_string());
    assert!(harness.completion_calls().is_empty());
}

#[tokio::test]
async fn share_returns_message_id() {
    let harness = Harness::with_summary("unused");

    let (status, body) = harness
        .post(
            "/api/share",
            json!({ "summary": "- Ship v2", "recipients": "a@x.com, b@x.com" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "id": "abc123" }));

    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["a@x.com", "b@x.com"]);
}

#[tokio::test]
async fn share_accepts_to_list() {
    let harness = Harness::with_summary("unused");

    let (status, _) = harness
        .post(
            "/api/share",
            json!({ "summary": "s", "to": ["a@x.com", " b@x.com "] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(harness.sent()[0].to, vec!["a@x.com", "b@x.com"]);
}

#[tokio::test]
async fn share_validation_failures() {
    let harness = Harness::with_summary("unused");

    let cases = [
        (json!({ "recipients": "a@x.com" }), "Summary required"),
        (json!({ "summary": "s" }), "Recipients required"),
        (json!({ "summary": "s", "recipients": [] }), "Recipients required"),
        (json!({ "summary": "s", "recipients": " , " }), "Recipients required"),
    ];

    for (payload, message) in cases {
        let (status, body) = harness.post("/api/share", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "ok": false, "error": message }));
    }
    assert!(harness.sent().is_empty());
}

#[tokio::test]
async fn share_failure_keeps_service_available() {
    let harness = Harness::new(json!({}), true);

    let (status, body) = harness
        .post("/api/share", json!({ "summary": "s", "recipients": "a@x.com" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "ok": false, "error": "Email send failed" }));

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = harness.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn share_escapes_summary_html() {
    let harness = Harness::with_summary("unused");

    harness
        .post(
            "/api/share",
            json!({ "summary": "<img src=x onerror=alert(1)>", "recipients": "a@x.com" }),
        )
        .await;

    let html = &harness.sent()[0].html;
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let mut config = Config::default();
    config.server.body_limit_bytes = 64;
    let harness = Harness::with_config(json!({}), false, config);

    let (status, body) = harness
        .post("/api/generate", json!({ "transcript": "x".repeat(1024) }))
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].is_string());
    assert!(harness.completion_calls().is_empty());
}

#[tokio::test]
async fn field_and_alias_together_are_refused() {
    let harness = Harness::with_summary("unused");

    let (status, body) = harness
        .post(
            "/api/share",
            json!({ "summary": "s", "to": "a@x.com", "recipients": "b@x.com" }),
        )
        .await;

    assert!(status.is_client_error());
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("duplicate field"));
    assert!(harness.sent().is_empty());
}
