//! # Progress Relay
//!
//! Channel and runner pair connecting a background pipeline stage to the
//! request task. A stage runs on its own tokio task and pushes free-form
//! progress strings through a [`ProgressRelay`]; the consumer polls
//! [`RunningStage::next_event`], which yields relayed messages in enqueue
//! order, an [`StageEvent::Idle`] signal when nothing arrives within one
//! idle tick (so the caller can keep the response stream warm), and finally
//! the stage outcome once every buffered message has been drained.
//!
//! The runner never aborts the background task. Early termination is
//! cooperative: units of work observe a `CancellationToken` at their own
//! checkpoints and return whatever partial results they have.

use std::{fmt::Display, future::Future, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

/// Default keep-alive cadence for idle stages.
pub const DEFAULT_IDLE_TICK: Duration = Duration::from_secs(1);

/// Producer half of a stage's progress channel.
#[derive(Debug, Clone)]
pub struct ProgressRelay {
    tx: mpsc::UnboundedSender<String>,
}

impl ProgressRelay {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queues a progress message. Dropped silently once the consumer is gone.
    pub fn send(&self, message: impl Into<String>) {
        let _ = self.tx.send(message.into());
    }
}

#[derive(Debug)]
pub enum StageEvent<T> {
    /// A message relayed from the running stage.
    Progress(String),
    /// Nothing arrived within one idle tick while the stage is still running.
    Idle,
    /// Terminal outcome; stage failures and panics are captured as strings.
    Done(Result<T, String>),
}

/// A unit of work executing on a background tokio task.
#[derive(Debug)]
pub struct RunningStage<T> {
    rx: mpsc::UnboundedReceiver<String>,
    handle: Option<JoinHandle<Result<T, String>>>,
    outcome: Option<Result<T, String>>,
    relay_closed: bool,
    idle_tick: Duration,
}

impl<T: Send + 'static> RunningStage<T> {
    pub fn spawn<F, E>(
        rx: mpsc::UnboundedReceiver<String>,
        idle_tick: Duration,
        work: F,
    ) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let handle = tokio::spawn(async move { work.await.map_err(|e| e.to_string()) });
        Self {
            rx,
            handle: Some(handle),
            outcome: None,
            relay_closed: false,
            idle_tick,
        }
    }

    /// Waits for the next stage event.
    ///
    /// Buffered progress always wins over the terminal outcome, so messages
    /// enqueued just before completion are still delivered first.
    pub async fn next_event(&mut self) -> StageEvent<T> {
        while let Some(mut handle) = self.handle.take() {
            tokio::select! {
                biased;
                maybe_msg = self.rx.recv(), if !self.relay_closed => {
                    self.handle = Some(handle);
                    match maybe_msg {
                        Some(message) => return StageEvent::Progress(message),
                        None => self.relay_closed = true,
                    }
                }
                join = &mut handle => {
                    self.outcome =
                        Some(join.unwrap_or_else(|e| Err(format!("stage task failed: {e}"))));
                }
                () = tokio::time::sleep(self.idle_tick) => {
                    self.handle = Some(handle);
                    return StageEvent::Idle;
                }
            }
        }

        match self.rx.try_recv() {
            Ok(message) => StageEvent::Progress(message),
            Err(_) => StageEvent::Done(
                self.outcome
                    .take()
                    .unwrap_or_else(|| Err("stage outcome already consumed".to_string())),
            ),
        }
    }
}
