use std::sync::{Arc, Mutex};

use analysis_store::Summary;
use comment_pulse::{relay::ProgressRelay, Summarizer};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            summary: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Summarizer for MockSummarizer {
    const SUMMARIZER_MODEL: &'static str = "mock-llm";
    type Error = anyhow::Error;

    async fn summarize(
        &self,
        comments: &[String],
        _progress: &ProgressRelay,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Summary> {
        self.calls.lock().unwrap().push(comments.to_vec());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(Summary::Text(self.summary.clone()))
    }
}
