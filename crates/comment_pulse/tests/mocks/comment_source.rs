use std::sync::{Arc, Mutex};

use comment_pulse::CommentSource;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
pub struct MockCommentSource {
    pub comments: Vec<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    pub cancel_when_done: Option<CancellationToken>,
}

impl MockCommentSource {
    pub fn new(comments: &[&str]) -> Self {
        Self {
            comments: comments.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn counting(count: usize) -> Self {
        Self {
            comments: (1..=count).map(|i| format!("comment {i}")).collect(),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    /// Cancels `token` just before returning, simulating a client that
    /// disconnects while extraction is still running.
    pub fn cancel_when_done(mut self, token: CancellationToken) -> Self {
        self.cancel_when_done = Some(token);
        self
    }
}

impl CommentSource for MockCommentSource {
    type Error = anyhow::Error;

    async fn fetch_comments(
        &self,
        video_url: &str,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<String>> {
        self.calls.lock().unwrap().push(video_url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        if let Some(ref token) = self.cancel_when_done {
            token.cancel();
        }
        Ok(self.comments.clone())
    }
}
