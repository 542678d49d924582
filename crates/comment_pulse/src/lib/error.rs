use thiserror::Error;

/// Errors raised by the YouTube comment source.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("YouTube API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Comments are disabled on this video")]
    CommentsDisabled,
    #[error("Could not extract a valid YouTube video ID from {0}")]
    InvalidVideoUrl(String),
}
