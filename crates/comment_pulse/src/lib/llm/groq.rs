use std::{sync::LazyLock, time::Duration};

use analysis_store::{CommentAnalysis, Summary};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{relay::ProgressRelay, Summarizer, Translator};

static NUMBERED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.):]\s*(.*)").unwrap());

pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    request_delay: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum GroqError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Groq API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Groq returned an empty completion")]
    EmptyCompletion,
}

impl GroqClient {
    const CHAT_MODEL: &'static str = "llama-3.3-70b-versatile";
    const SUMMARY_SCHEMA: &'static str = include_str!("./prompts/summary_schema.json");

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            request_delay: Duration::from_secs(5),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Pause between consecutive completion requests, a courtesy to the
    /// per-minute rate limits on free Groq keys.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub async fn send_completion_request(
        &self,
        model_name: impl Into<String>,
        user_content: impl Into<String>,
        json_mode: bool,
    ) -> Result<CompletionResponse, GroqError> {
        let mut body = serde_json::json!({
            "model": model_name.into(),
            "messages": [
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });
        if json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GroqError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }

    async fn completion_text(
        &self,
        model_name: &str,
        prompt: String,
        json_mode: bool,
    ) -> Result<String, GroqError> {
        let response = self
            .send_completion_request(model_name, prompt, json_mode)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GroqError::EmptyCompletion)
    }

    async fn translate_batch(&self, batch: &[String]) -> Result<Vec<String>, GroqError> {
        let mut prompt_lines = vec![
            "Translate the following YouTube comments to English. Return only the \
             translations in the exact same numbered format, preserving emojis and meaning:"
                .to_string(),
        ];
        for (idx, comment) in batch.iter().enumerate() {
            prompt_lines.push(format!("{}. {}", idx + 1, comment));
        }

        let text = self
            .completion_text(
                <Self as Translator>::TRANSLATOR_MODEL,
                prompt_lines.join("\n"),
                false,
            )
            .await?;

        Ok(parse_numbered_translations(&text, batch))
    }

    async fn combine_chunk_summaries(&self, chunk_summaries: Vec<String>) -> Summary {
        let prompt = format!(
            "Combine and format the following chunk summaries into a comprehensive analysis.\n\
             You must return a strictly valid JSON object matching this exact schema:\n{}\n\
             Chunk Summaries to analyze:\n\n{}",
            Self::SUMMARY_SCHEMA,
            chunk_summaries.join("\n\n")
        );

        match self
            .completion_text(<Self as Summarizer>::SUMMARIZER_MODEL, prompt, true)
            .await
        {
            Ok(text) => match serde_json::from_str::<CommentAnalysis>(&text) {
                Ok(analysis) => Summary::Structured(analysis),
                Err(e) => {
                    tracing::warn!(error = %e, "Final summary was not valid JSON, keeping chunk text");
                    Summary::Text(chunk_summaries.join("\n\n"))
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Final summary request failed, keeping chunk text");
                Summary::Text(chunk_summaries.join("\n\n"))
            }
        }
    }
}

/// Maps a numbered completion back onto the batch it was produced for.
/// Unnumbered lines are kept verbatim; when the model returns fewer lines
/// than comments the untranslated tail is carried over as-is.
fn parse_numbered_translations(text: &str, batch: &[String]) -> Vec<String> {
    let mut parsed: Vec<String> = Vec::with_capacity(batch.len());
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match NUMBERED_LINE_RE.captures(line) {
            Some(caps) => parsed.push(caps[1].to_string()),
            None => parsed.push(line.to_string()),
        }
    }

    if parsed.len() < batch.len() {
        parsed.extend(batch[parsed.len()..].iter().cloned());
    }
    parsed.truncate(batch.len());
    parsed
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl Translator for GroqClient {
    const TRANSLATOR_MODEL: &'static str = Self::CHAT_MODEL;
    type Error = GroqError;

    async fn translate(
        &self,
        comments: &[String],
        progress: &ProgressRelay,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, Self::Error> {
        let total_batches = comments.len().div_ceil(Self::BATCH_SIZE);
        let mut translated = Vec::with_capacity(comments.len());

        for (idx, batch) in comments.chunks(Self::BATCH_SIZE).enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("Translation cancelled, returning partial results");
                break;
            }
            progress.send(format!("Translating batch {}/{}...", idx + 1, total_batches));

            match self.translate_batch(batch).await {
                Ok(batch_translated) => translated.extend(batch_translated),
                Err(e) => {
                    tracing::warn!(error = %e, batch = idx + 1, "Batch translation failed, keeping original text");
                    translated.extend(batch.iter().cloned());
                }
            }

            if idx + 1 < total_batches {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        Ok(translated)
    }
}

impl Summarizer for GroqClient {
    const SUMMARIZER_MODEL: &'static str = Self::CHAT_MODEL;
    type Error = GroqError;

    async fn summarize(
        &self,
        comments: &[String],
        progress: &ProgressRelay,
        cancel: &CancellationToken,
    ) -> Result<Summary, Self::Error> {
        let total_chunks = comments.len().div_ceil(Self::CHUNK_SIZE);
        let mut chunk_summaries = Vec::new();

        for (idx, chunk) in comments.chunks(Self::CHUNK_SIZE).enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("Summarization cancelled");
                break;
            }
            progress.send(format!("Summarising chunk {}/{}...", idx + 1, total_chunks));

            let prompt = format!(
                "Summarize the following English YouTube comments into the main themes, \
                 common feedback, and any recurring bug reports:\n\n{}",
                chunk
                    .iter()
                    .map(|c| format!("- {c}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            );

            match self
                .completion_text(Self::SUMMARIZER_MODEL, prompt, false)
                .await
            {
                Ok(summary) => chunk_summaries.push(summary),
                Err(e) => {
                    tracing::warn!(error = %e, chunk = idx + 1, "Chunk summarization failed, skipping");
                }
            }

            if idx + 1 < total_chunks {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        if chunk_summaries.is_empty() {
            return Ok(Summary::Text(
                "Not enough data or summarization failed.".to_string(),
            ));
        }
        if cancel.is_cancelled() {
            return Ok(Summary::Text(
                "Not enough data or summarization aborted.".to_string(),
            ));
        }

        progress.send("Generating final structured summary...");
        Ok(self.combine_chunk_summaries(chunk_summaries).await)
    }
}
