use std::time::Duration;

use analysis_store::AnalysisStore;

use crate::{
    relay::DEFAULT_IDLE_TICK, CommentProcessor, CommentSource, Summarizer, Translator,
};

pub struct CommentProcessorBuilder<S = (), T = (), Z = (), C = ()> {
    source: S,
    translator: T,
    summarizer: Z,
    store: C,
    idle_tick: Duration,
}

impl CommentProcessorBuilder {
    pub fn new() -> Self {
        Self {
            source: (),
            translator: (),
            summarizer: (),
            store: (),
            idle_tick: DEFAULT_IDLE_TICK,
        }
    }
}

impl Default for CommentProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T, Z, C> CommentProcessorBuilder<S, T, Z, C> {
    pub fn comment_source<S2: CommentSource + Send + Sync + 'static>(
        self,
        source: S2,
    ) -> CommentProcessorBuilder<S2, T, Z, C> {
        CommentProcessorBuilder {
            source,
            translator: self.translator,
            summarizer: self.summarizer,
            store: self.store,
            idle_tick: self.idle_tick,
        }
    }

    pub fn translator<T2: Translator + Send + Sync + 'static>(
        self,
        translator: T2,
    ) -> CommentProcessorBuilder<S, T2, Z, C> {
        CommentProcessorBuilder {
            source: self.source,
            translator,
            summarizer: self.summarizer,
            store: self.store,
            idle_tick: self.idle_tick,
        }
    }

    pub fn summarizer<Z2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: Z2,
    ) -> CommentProcessorBuilder<S, T, Z2, C> {
        CommentProcessorBuilder {
            source: self.source,
            translator: self.translator,
            summarizer,
            store: self.store,
            idle_tick: self.idle_tick,
        }
    }

    pub fn store<C2: AnalysisStore + Send + Sync + 'static>(
        self,
        store: C2,
    ) -> CommentProcessorBuilder<S, T, Z, C2> {
        CommentProcessorBuilder {
            source: self.source,
            translator: self.translator,
            summarizer: self.summarizer,
            store,
            idle_tick: self.idle_tick,
        }
    }

    /// Keep-alive cadence while a stage is silent.
    pub fn idle_tick(mut self, idle_tick: Duration) -> Self {
        self.idle_tick = idle_tick;
        self
    }
}

impl<S, T, Z, C> CommentProcessorBuilder<S, T, Z, C>
where
    S: CommentSource + Send + Sync + 'static,
    T: Translator + Send + Sync + 'static,
    Z: Summarizer + Send + Sync + 'static,
    C: AnalysisStore + Send + Sync + 'static,
{
    pub fn build(self) -> CommentProcessor<S, T, Z, C> {
        CommentProcessor {
            source: self.source,
            translator: self.translator,
            summarizer: self.summarizer,
            store: self.store,
            idle_tick: self.idle_tick,
        }
    }
}
