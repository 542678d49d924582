use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use comment_pulse::{relay::ProgressRelay, Translator};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
pub struct MockTranslator {
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub fail_with: Option<String>,
    pub delay: Option<Duration>,
    pub progress_messages: Vec<String>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_progress(mut self, messages: &[&str]) -> Self {
        self.progress_messages = messages.iter().map(|m| m.to_string()).collect();
        self
    }
}

impl Translator for MockTranslator {
    const TRANSLATOR_MODEL: &'static str = "mock-llm";
    type Error = anyhow::Error;

    async fn translate(
        &self,
        comments: &[String],
        progress: &ProgressRelay,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<String>> {
        self.calls.lock().unwrap().push(comments.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        for message in &self.progress_messages {
            progress.send(message.clone());
        }
        Ok(comments.iter().map(|c| format!("{c} [en]")).collect())
    }
}
