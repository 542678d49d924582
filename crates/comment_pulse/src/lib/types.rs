use analysis_store::VideoAnalysis;
use serde::Serialize;
use tokio::sync::mpsc;

/// Pipeline phase carried on progress records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extracting,
    Translating,
    Complete,
}

/// One record of the event stream. Absent fields are omitted from the JSON;
/// an error record carries only `error`.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<VideoAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn status(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            status: Some(stage),
            message: Some(message.into()),
            results: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: None,
            results: None,
            error: Some(message.into()),
        }
    }

    pub fn complete(results: VideoAnalysis) -> Self {
        Self {
            status: Some(Stage::Complete),
            message: None,
            results: Some(results),
            error: None,
        }
    }
}

/// Item flowing from the orchestrator to the response stream.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Data(ProgressEvent),
    /// Idle-tick signal; rendered as a padded comment record on the wire.
    KeepAlive,
}

/// Producer half of the response event channel.
///
/// Sends after the consumer has gone away (client disconnect) are dropped;
/// the pipeline stops through the cancellation token instead.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<StreamEvent>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn status(&self, stage: Stage, message: impl Into<String>) {
        self.send(StreamEvent::Data(ProgressEvent::status(stage, message)));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(StreamEvent::Data(ProgressEvent::error(message)));
    }

    pub fn complete(&self, results: VideoAnalysis) {
        self.send(StreamEvent::Data(ProgressEvent::complete(results)));
    }

    pub fn keep_alive(&self) {
        self.send(StreamEvent::KeepAlive);
    }

    fn send(&self, event: StreamEvent) {
        let _ = self.tx.send(event);
    }
}
