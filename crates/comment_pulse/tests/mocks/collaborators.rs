use comment_pulse::api::CollaboratorProvider;

use super::{
    comment_source::MockCommentSource, summarizer::MockSummarizer, translator::MockTranslator,
};

/// Provider handing out clones of the same recording mocks for every
/// request, so tests can observe calls across retries.
#[derive(Clone)]
pub struct MockCollaborators {
    pub source: MockCommentSource,
    pub translator: MockTranslator,
    pub summarizer: MockSummarizer,
}

impl MockCollaborators {
    pub fn new(
        source: MockCommentSource,
        translator: MockTranslator,
        summarizer: MockSummarizer,
    ) -> Self {
        Self {
            source,
            translator,
            summarizer,
        }
    }
}

impl CollaboratorProvider for MockCollaborators {
    type Source = MockCommentSource;
    type Translator = MockTranslator;
    type Summarizer = MockSummarizer;

    fn comment_source(&self, _api_key: &str) -> MockCommentSource {
        self.source.clone()
    }

    fn translator(&self, _api_key: &str) -> MockTranslator {
        self.translator.clone()
    }

    fn summarizer(&self, _api_key: &str) -> MockSummarizer {
        self.summarizer.clone()
    }
}
