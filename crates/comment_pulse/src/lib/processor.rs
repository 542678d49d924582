use std::time::Duration;

use analysis_store::{AnalysisStore, Summary, VideoAnalysis};
use tokio_util::sync::CancellationToken;

use crate::{
    relay::{ProgressRelay, RunningStage, StageEvent},
    types::{EventSink, Stage},
    CommentSource, Summarizer, Translator,
};

pub mod builder;

// The core comment analysis pipeline: extract, then translate + summarize.
#[derive(Debug)]
pub struct CommentProcessor<S, T, Z, C>
where
    S: CommentSource + Send + Sync + 'static,
    T: Translator + Send + Sync + 'static,
    Z: Summarizer + Send + Sync + 'static,
    C: AnalysisStore + Send + Sync + 'static,
{
    source: S,
    translator: T,
    summarizer: Z,
    store: C,
    idle_tick: Duration,
}

struct LanguageOutput {
    translated_comments: Vec<String>,
    summary: Summary,
}

impl<S, T, Z, C> CommentProcessor<S, T, Z, C>
where
    S: CommentSource + Send + Sync + 'static,
    T: Translator + Send + Sync + 'static,
    Z: Summarizer + Send + Sync + 'static,
    C: AnalysisStore + Send + Sync + 'static,
{
    /// Comment samples carried on the final record are capped at this many
    /// entries; `extracted_count` still reports the full total.
    const SAMPLE_LIMIT: usize = 20;

    /// Runs the pipeline once, pushing every record into `events`.
    ///
    /// Failures never escape: stage errors become `error` records and a
    /// cancelled run stops silently without a terminal record.
    #[tracing::instrument(skip_all, fields(video_url = %video_url, request_id = %request_id))]
    pub async fn run(
        self,
        video_url: String,
        request_id: String,
        events: EventSink,
        cancel: CancellationToken,
    ) {
        if let Err(e) = self
            .run_inner(&video_url, &request_id, &events, &cancel)
            .await
        {
            tracing::error!(error = ?e, "Pipeline failed unexpectedly");
            events.error(e.to_string());
        }
    }

    async fn run_inner(
        self,
        video_url: &str,
        request_id: &str,
        events: &EventSink,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        let CommentProcessor {
            source,
            translator,
            summarizer,
            store,
            idle_tick,
        } = self;

        events.status(Stage::Extracting, "Fetching comments from YouTube...");

        let extract_stage = {
            // the extraction stage emits no progress of its own; the channel
            // still drives the keep-alive ticks
            let (_relay, relay_rx) = ProgressRelay::channel();
            let cancel = cancel.clone();
            let url = video_url.to_string();
            RunningStage::spawn(relay_rx, idle_tick, async move {
                source.fetch_comments(&url, &cancel).await
            })
        };

        let extracted = relay_stage_events(extract_stage, Stage::Extracting, events).await;
        if cancel.is_cancelled() {
            tracing::info!("Client disconnected during extraction, stopping silently");
            return Ok(());
        }
        let comments = match extracted {
            Ok(comments) => comments,
            Err(message) => {
                events.error(message);
                return Ok(());
            }
        };
        if comments.is_empty() {
            events.error("No comments found for this video.");
            return Ok(());
        }

        events.status(Stage::Extracting, "Extracted comments successfully.");
        events.status(
            Stage::Translating,
            format!("Translating and summarizing {} comments...", comments.len()),
        );

        let language_stage = {
            let (relay, relay_rx) = ProgressRelay::channel();
            let cancel = cancel.clone();
            let comments = comments.clone();
            RunningStage::spawn::<_, String>(relay_rx, idle_tick, async move {
                let translated = translator
                    .translate(&comments, &relay, &cancel)
                    .await
                    .map_err(|e| e.to_string())?;
                if cancel.is_cancelled() {
                    return Ok(LanguageOutput {
                        translated_comments: translated,
                        summary: Summary::Text("Process aborted by user.".to_string()),
                    });
                }
                let summary = summarizer
                    .summarize(&translated, &relay, &cancel)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(LanguageOutput {
                    translated_comments: translated,
                    summary,
                })
            })
        };

        let outcome = relay_stage_events(language_stage, Stage::Translating, events).await;
        if cancel.is_cancelled() {
            tracing::info!("Client disconnected during language stage, stopping silently");
            return Ok(());
        }
        let output = match outcome {
            Ok(output) => output,
            Err(message) => {
                events.error(message);
                return Ok(());
            }
        };

        let extracted_count = comments.len();
        let mut comments = comments;
        comments.truncate(Self::SAMPLE_LIMIT);
        let mut translated_comments = output.translated_comments;
        translated_comments.truncate(Self::SAMPLE_LIMIT);

        let analysis = VideoAnalysis {
            extracted_count,
            comments,
            translated_comments,
            summary: output.summary,
        };
        store.put(request_id, analysis.clone()).await;
        events.complete(analysis);

        Ok(())
    }
}

/// Forwards stage events to the client until the stage finishes: progress
/// messages under the stage's label, idle ticks as keep-alives.
async fn relay_stage_events<T: Send + 'static>(
    mut stage: RunningStage<T>,
    label: Stage,
    events: &EventSink,
) -> Result<T, String> {
    loop {
        match stage.next_event().await {
            StageEvent::Progress(message) => events.status(label, message),
            StageEvent::Idle => events.keep_alive(),
            StageEvent::Done(outcome) => return outcome,
        }
    }
}
