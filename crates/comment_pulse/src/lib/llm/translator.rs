use std::{
    fmt::{Debug, Display},
    future::Future,
};

use tokio_util::sync::CancellationToken;

use crate::relay::ProgressRelay;

/// Batched comment translation.
///
/// Implementations check the token at each batch boundary and return the
/// translations accumulated so far when it fires; an in-flight API call is
/// not aborted.
pub trait Translator {
    const BATCH_SIZE: usize = 20;
    const TRANSLATOR_MODEL: &'static str;

    type Error: Display + Debug + Send + 'static;

    fn translate(
        &self,
        comments: &[String],
        progress: &ProgressRelay,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}
