use crate::{groq::GroqClient, CommentSource, Summarizer, Translator, YouTubeClient};

/// Builds the per-request collaborators from the client-supplied API keys.
///
/// A trait seam so router tests can substitute recording mocks and verify
/// which collaborators a request did (or did not) touch.
pub trait CollaboratorProvider {
    type Source: CommentSource + Send + Sync + 'static;
    type Translator: Translator + Send + Sync + 'static;
    type Summarizer: Summarizer + Send + Sync + 'static;

    fn comment_source(&self, api_key: &str) -> Self::Source;
    fn translator(&self, api_key: &str) -> Self::Translator;
    fn summarizer(&self, api_key: &str) -> Self::Summarizer;
}

/// Live collaborators backed by the YouTube Data API and Groq.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpCollaborators;

impl CollaboratorProvider for HttpCollaborators {
    type Source = YouTubeClient;
    type Translator = GroqClient;
    type Summarizer = GroqClient;

    fn comment_source(&self, api_key: &str) -> YouTubeClient {
        YouTubeClient::new(api_key)
    }

    fn translator(&self, api_key: &str) -> GroqClient {
        GroqClient::new(api_key)
    }

    fn summarizer(&self, api_key: &str) -> GroqClient {
        GroqClient::new(api_key)
    }
}
