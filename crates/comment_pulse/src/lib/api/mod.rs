//! HTTP surface: health probes plus the streaming process-video endpoint.

mod handlers;
mod provider;

pub use provider::{CollaboratorProvider, HttpCollaborators};

use std::time::Duration;

use analysis_store::AnalysisStore;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::relay::DEFAULT_IDLE_TICK;

/// Shared state behind every route.
#[derive(Debug)]
pub struct AppState<P, C> {
    pub provider: P,
    pub store: C,
    /// Keep-alive cadence for idle streaming responses.
    pub idle_tick: Duration,
}

impl<P: Clone, C: Clone> Clone for AppState<P, C> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            store: self.store.clone(),
            idle_tick: self.idle_tick,
        }
    }
}

impl<P, C> AppState<P, C> {
    pub fn new(provider: P, store: C) -> Self {
        Self {
            provider,
            store,
            idle_tick: DEFAULT_IDLE_TICK,
        }
    }

    pub fn with_idle_tick(mut self, idle_tick: Duration) -> Self {
        self.idle_tick = idle_tick;
        self
    }
}

/// Builds the application router. CORS is wide open so browser frontends on
/// any origin can reach the API.
pub fn api_routes<P, C>(state: AppState<P, C>) -> Router
where
    P: CollaboratorProvider + Clone + Send + Sync + 'static,
    C: AnalysisStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/api/process-video", post(handlers::process_video::<P, C>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
