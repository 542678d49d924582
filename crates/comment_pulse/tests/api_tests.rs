mod mocks;

use std::time::Duration;

use analysis_store::InMemoryStore;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use comment_pulse::api::{api_routes, AppState};
use mocks::{
    collaborators::MockCollaborators, comment_source::MockCommentSource,
    summarizer::MockSummarizer, translator::MockTranslator,
};
use tower::ServiceExt;

fn test_app(collaborators: MockCollaborators) -> Router {
    api_routes(AppState::new(collaborators, InMemoryStore::default()))
}

fn default_collaborators() -> MockCollaborators {
    MockCollaborators::new(
        MockCommentSource::new(&["first", "second", "third"]),
        MockTranslator::new(),
        MockSummarizer::new("## Summary"),
    )
}

fn process_body(url: &str, request_id: &str) -> serde_json::Value {
    serde_json::json!({
        "url": url,
        "youtube_api_key": "yt-key",
        "groq_api_key": "groq-key",
        "request_id": request_id,
    })
}

async fn post_process(app: Router, body: serde_json::Value) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/process-video")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// `data:` records of an event-stream body, parsed as JSON.
fn data_records(body: &str) -> Vec<serde_json::Value> {
    body.split("\n\n")
        .filter_map(|record| record.strip_prefix("data:"))
        .map(|json| serde_json::from_str(json.trim_start()).expect("record should be valid JSON"))
        .collect()
}

/// Anonymous comment records (keep-alive padding).
fn comment_records(body: &str) -> Vec<&str> {
    body.split("\n\n")
        .filter(|record| record.starts_with(':'))
        .collect()
}

// ─── Health endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn home_reports_healthy() {
    let app = test_app(default_collaborators());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn health_reports_awake() {
    let app = test_app(default_collaborators());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "awake" }));
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_url_is_rejected_before_any_work() {
    let collaborators = default_collaborators();
    let source_calls = collaborators.source.calls.clone();
    let app = test_app(collaborators);

    let (status, body) = post_process(
        app,
        serde_json::json!({
            "youtube_api_key": "yt-key",
            "groq_api_key": "groq-key",
            "request_id": "req-1",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "URL is required");
    assert!(
        source_calls.lock().unwrap().is_empty(),
        "comment source must not be invoked"
    );
}

#[tokio::test]
async fn blank_api_keys_are_rejected() {
    let collaborators = default_collaborators();
    let source_calls = collaborators.source.calls.clone();
    let app = test_app(collaborators);

    let (status, body) = post_process(
        app,
        serde_json::json!({
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "youtube_api_key": "yt-key",
            "groq_api_key": "   ",
            "request_id": "req-1",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Both YouTube and Groq API keys are required.");
    assert!(source_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_request_id_is_rejected() {
    let collaborators = default_collaborators();
    let source_calls = collaborators.source.calls.clone();
    let app = test_app(collaborators);

    let (status, body) = post_process(
        app,
        serde_json::json!({
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "youtube_api_key": "yt-key",
            "groq_api_key": "groq-key",
            "request_id": "",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json["error"],
        "request_id is required to prevent duplicate processing."
    );
    assert!(source_calls.lock().unwrap().is_empty());
}

// ─── Streaming ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn process_video_streams_the_full_pipeline() {
    let app = test_app(default_collaborators());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/process-video")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    process_body("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "req-1")
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap();
    assert!(
        content_type.starts_with("text/event-stream"),
        "unexpected content type {content_type}"
    );
    assert_eq!(response.headers()["cache-control"], "no-cache");
    assert_eq!(response.headers()["x-accel-buffering"], "no");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    let records = data_records(&body);

    assert_eq!(records.len(), 4, "unexpected records: {records:?}");
    assert_eq!(records[0]["status"], "extracting");
    let complete = &records[3];
    assert_eq!(complete["status"], "complete");
    assert_eq!(complete["results"]["extracted_count"], 3);
    assert_eq!(complete["results"]["comments"][0], "first");
    assert_eq!(complete["results"]["translated_comments"][0], "first [en]");
    assert_eq!(complete["results"]["summary"], "## Summary");
}

#[tokio::test]
async fn empty_video_streams_a_single_error_record() {
    let collaborators = MockCollaborators::new(
        MockCommentSource::empty(),
        MockTranslator::new(),
        MockSummarizer::new("unused"),
    );
    let app = test_app(collaborators);

    let (status, body) = post_process(
        app,
        process_body("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "req-1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let records = data_records(&body);
    let errors: Vec<_> = records.iter().filter(|r| r.get("error").is_some()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["error"], "No comments found for this video.");
    assert!(!records.iter().any(|r| r["status"] == "translating"));
}

// ─── Dedup cache ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn repeated_request_id_replays_the_cached_result() {
    let collaborators = default_collaborators();
    let source_calls = collaborators.source.calls.clone();
    let translator_calls = collaborators.translator.calls.clone();
    let app = test_app(collaborators);

    let (_, first_body) = post_process(
        app.clone(),
        process_body("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "req-1"),
    )
    .await;
    let first_records = data_records(&first_body);
    let first_result = first_records.last().unwrap()["results"].clone();

    // same request id, different URL: the cache key is the request id alone
    let (status, second_body) = post_process(
        app,
        process_body("https://www.youtube.com/watch?v=different123", "req-1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let second_records = data_records(&second_body);
    assert_eq!(
        second_records.len(),
        2,
        "cache hit must produce exactly two records: {second_records:?}"
    );
    assert_eq!(second_records[0]["status"], "extracting");
    assert_eq!(second_records[0]["message"], "Loading results from cache...");
    assert_eq!(second_records[1]["status"], "complete");
    assert_eq!(second_records[1]["results"], first_result);

    assert_eq!(
        source_calls.lock().unwrap().len(),
        1,
        "comment source must not run again"
    );
    assert_eq!(
        translator_calls.lock().unwrap().len(),
        1,
        "translator must not run again"
    );
}

// ─── Keep-alive ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn slow_stage_pads_the_stream_with_comment_records() {
    let collaborators = MockCollaborators::new(
        MockCommentSource::new(&["a"]),
        MockTranslator::new().with_delay(Duration::from_millis(80)),
        MockSummarizer::new("summary"),
    );
    let state = AppState::new(collaborators, InMemoryStore::default())
        .with_idle_tick(Duration::from_millis(15));
    let app = api_routes(state);

    let (status, body) = post_process(
        app,
        process_body("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "req-1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let padding = comment_records(&body);
    assert!(
        !padding.is_empty(),
        "expected keep-alive padding while the translator was busy"
    );
    assert!(
        padding.iter().all(|record| record.len() > 2000),
        "padding records should be large enough to defeat buffering"
    );

    let records = data_records(&body);
    assert_eq!(records.last().unwrap()["status"], "complete");
}
