pub mod api;
mod error;
mod llm;
mod processor;
pub mod relay;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::groq;
pub use llm::{summarizer::Summarizer, translator::Translator};
pub use processor::{builder::CommentProcessorBuilder, CommentProcessor};
pub use yt::{comments::YouTubeClient, CommentSource};
