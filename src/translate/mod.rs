// Chunked translation with per-word glosses
//
// - common: OpenAI-compatible chat completion client used in production
// - chunked: splits text into chunks, translates each and merges the results

pub mod common;
pub mod chunked;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use chunked::ChunkedTranslator;
pub use common::{ChatCompletionClient, check_model_availability};
use crate::error::Result;

/// Text to translate and the human-readable name of the target language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub target_lang: String,
}

/// One source word and its literal translation, as reported by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMapping {
    pub original: String,
    pub translated: String,
}

/// Merged result over all chunks of a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub full_translation: String,
    pub word_mapping: Vec<WordMapping>,
}

/// A chat completion backend that answers in JSON mode.
///
/// Implementations must be safe to share across concurrent requests; one
/// instance is built at startup and reused for the lifetime of the process.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a system instruction plus user content and return the raw JSON text of the reply
    async fn complete_json(&self, system_prompt: &str, user_content: &str) -> Result<String>;
}
