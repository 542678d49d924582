//! YouTube Data API v3 comment listing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{error::Error, yt::CommentSource};

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

/// Extracts the 11-character video id from the common YouTube URL shapes
/// (`watch?v=`, `youtu.be/`, `embed/`, shorts).
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://www.googleapis.com/youtube/v3".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentThreadsResponse, Error> {
        let page_size = <Self as CommentSource>::PAGE_SIZE.to_string();
        let mut request = self
            .client
            .get(format!("{}/commentThreads", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("videoId", video_id),
                ("textFormat", "plainText"),
                ("maxResults", page_size.as_str()),
                ("key", self.api_key.as_str()),
            ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            if message.contains("commentsDisabled") {
                return Err(Error::CommentsDisabled);
            }
            return Err(Error::Api { status, message });
        }

        Ok(resp.json::<CommentThreadsResponse>().await?)
    }
}

impl CommentSource for YouTubeClient {
    type Error = Error;

    async fn fetch_comments(
        &self,
        video_url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, Error> {
        let video_id = extract_video_id(video_url)
            .ok_or_else(|| Error::InvalidVideoUrl(video_url.to_string()))?;

        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            if cancel.is_cancelled() {
                tracing::info!("Comment extraction cancelled, returning partial results");
                break;
            }

            let page = self.fetch_page(video_id, page_token.as_deref()).await?;
            for item in page.items {
                let text = item.snippet.top_level_comment.snippet.text_display;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    comments.push(trimmed.to_string());
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        tracing::info!(count = comments.len(), "Fetched top-level comments");
        Ok(comments)
    }
}

#[derive(Debug, Deserialize)]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textDisplay", default)]
    text_display: String,
}
