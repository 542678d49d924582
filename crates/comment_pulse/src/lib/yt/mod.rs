pub mod comments;

use std::{
    fmt::{Debug, Display},
    future::Future,
};

use tokio_util::sync::CancellationToken;

/// Paginated source of public comment text for a video URL.
///
/// Implementations check the token at each page boundary and return the
/// comments collected so far when it fires.
pub trait CommentSource {
    const PAGE_SIZE: u32 = 100;

    type Error: Display + Debug + Send + 'static;

    fn fetch_comments(
        &self,
        video_url: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}
