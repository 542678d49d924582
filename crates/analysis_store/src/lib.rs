//! # AnalysisStore Module
//!
//! This module provides the idempotency store for completed comment
//! analyses: a map from client-supplied request id to the finished
//! [`VideoAnalysis`] payload.
//!
//! The store is an explicit service object injected into the pipeline and
//! the HTTP state. The in-memory implementation keeps entries for the life
//! of the process with no eviction, so a retried request id replays the
//! cached result instead of re-invoking the paid LLM API.

mod domain;
mod store;

pub use domain::{CommentAnalysis, MainIssue, Summary, VideoAnalysis};
pub use store::{AnalysisStore, InMemoryStore};
