use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::sync::RwLock;

use crate::VideoAnalysis;

/// Idempotency store contract.
///
/// Lookups and inserts are async so a bounded or remote cache can be swapped
/// in behind the same trait. The in-process map cannot fail, so the contract
/// is infallible; entries are written at most once per request id.
pub trait AnalysisStore {
    fn get(&self, request_id: &str) -> impl Future<Output = Option<VideoAnalysis>> + Send;

    fn put(
        &self,
        request_id: &str,
        analysis: VideoAnalysis,
    ) -> impl Future<Output = ()> + Send;
}

impl<T: AnalysisStore + Send + Sync> AnalysisStore for &T {
    async fn get(&self, request_id: &str) -> Option<VideoAnalysis> {
        (**self).get(request_id).await
    }

    async fn put(&self, request_id: &str, analysis: VideoAnalysis) {
        (**self).put(request_id, analysis).await;
    }
}

/// Process-lifetime in-memory store. No eviction and no TTL, so sustained
/// traffic with unique request ids grows it without bound.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<String, VideoAnalysis>>>,
}

impl InMemoryStore {
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl AnalysisStore for InMemoryStore {
    async fn get(&self, request_id: &str) -> Option<VideoAnalysis> {
        self.inner.read().await.get(request_id).cloned()
    }

    async fn put(&self, request_id: &str, analysis: VideoAnalysis) {
        let mut entries = self.inner.write().await;
        // first writer wins: a replayed id never overwrites the stored result
        if entries.contains_key(request_id) {
            tracing::warn!(request_id, "Duplicate analysis insert ignored");
            return;
        }
        entries.insert(request_id.to_string(), analysis);
        tracing::debug!(request_id, total = entries.len(), "Stored analysis");
    }
}
