use std::{
    fmt::{Debug, Display},
    future::Future,
};

use analysis_store::Summary;
use tokio_util::sync::CancellationToken;

use crate::relay::ProgressRelay;

/// Chunked comment summarization.
pub trait Summarizer {
    const CHUNK_SIZE: usize = 500;
    const SUMMARIZER_MODEL: &'static str;

    type Error: Display + Debug + Send + 'static;

    fn summarize(
        &self,
        comments: &[String],
        progress: &ProgressRelay,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Summary, Self::Error>> + Send;
}
