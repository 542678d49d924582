use std::convert::Infallible;

use analysis_store::AnalysisStore;
use axum::{
    extract::State,
    http::{header::CACHE_CONTROL, HeaderName, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{AppState, CollaboratorProvider};
use crate::{
    types::{EventSink, Stage, StreamEvent},
    CommentProcessorBuilder,
};

/// Spaces carried on keep-alive comment records, sized to force buffering
/// proxies and CDNs to flush the connection.
const KEEPALIVE_PADDING: usize = 2048;

pub(super) async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "comment-pulse backend is running"
    }))
}

pub(super) async fn health() -> Json<serde_json::Value> {
    tracing::info!("Liveness probe");
    Json(serde_json::json!({ "status": "awake" }))
}

#[derive(Debug, Deserialize)]
pub(super) struct ProcessVideoRequest {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    youtube_api_key: String,
    #[serde(default)]
    groq_api_key: String,
    #[serde(default)]
    request_id: String,
}

/// POST /api/process-video — validate, dispatch the pipeline, stream records.
///
/// Validation failures are rejected with 400 before any background work
/// starts. A request id seen before replays the cached result as a
/// two-record stream without touching either external API.
pub(super) async fn process_video<P, C>(
    State(state): State<AppState<P, C>>,
    Json(request): Json<ProcessVideoRequest>,
) -> Response
where
    P: CollaboratorProvider + Clone + Send + Sync + 'static,
    C: AnalysisStore + Clone + Send + Sync + 'static,
{
    let url = match request.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return bad_request("URL is required"),
    };
    let youtube_api_key = request.youtube_api_key.trim().to_string();
    let groq_api_key = request.groq_api_key.trim().to_string();
    if youtube_api_key.is_empty() || groq_api_key.is_empty() {
        return bad_request("Both YouTube and Groq API keys are required.");
    }
    let request_id = request.request_id.trim().to_string();
    if request_id.is_empty() {
        return bad_request("request_id is required to prevent duplicate processing.");
    }

    let (events, events_rx) = EventSink::channel();
    let cancel = CancellationToken::new();

    if let Some(cached) = state.store.get(&request_id).await {
        tracing::info!(%request_id, "Replaying cached analysis");
        events.status(Stage::Extracting, "Loading results from cache...");
        events.complete(cached);
    } else {
        let processor = CommentProcessorBuilder::new()
            .comment_source(state.provider.comment_source(&youtube_api_key))
            .translator(state.provider.translator(&groq_api_key))
            .summarizer(state.provider.summarizer(&groq_api_key))
            .store(state.store.clone())
            .idle_tick(state.idle_tick)
            .build();
        tokio::spawn(processor.run(url, request_id, events.clone(), cancel.clone()));
    }
    // the stream must end once the remaining sender (if any) is dropped
    drop(events);

    event_stream_response(events_rx, cancel)
}

/// Cancels the pipeline when the response body is dropped, which is how a
/// client disconnect surfaces server-side.
struct CancelOnDisconnect(CancellationToken);

impl Drop for CancelOnDisconnect {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

fn event_stream_response(
    events_rx: mpsc::UnboundedReceiver<StreamEvent>,
    cancel: CancellationToken,
) -> Response {
    let guard = CancelOnDisconnect(cancel);
    let stream = futures::stream::unfold((events_rx, guard), |(mut rx, guard)| async move {
        let event = rx.recv().await?;
        Some((Ok::<Event, Infallible>(to_sse_event(&event)), (rx, guard)))
    });

    let headers = [
        (CACHE_CONTROL, "no-cache"),
        (HeaderName::from_static("x-accel-buffering"), "no"),
    ];
    (headers, Sse::new(stream)).into_response()
}

fn to_sse_event(event: &StreamEvent) -> Event {
    match event {
        StreamEvent::Data(record) => match serde_json::to_string(record) {
            Ok(json) => Event::default().data(json),
            Err(e) => {
                Event::default().data(format!(r#"{{"error":"failed to serialize record: {e}"}}"#))
            }
        },
        StreamEvent::KeepAlive => Event::default().comment(" ".repeat(KEEPALIVE_PADDING)),
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
