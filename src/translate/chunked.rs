use std::sync::Arc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::chunker::chunk_text;
use crate::error::{GlossaError, Result};
use super::{CompletionClient, TranslationRequest, TranslationResult, WordMapping};

/// Shape the model is asked to return for every chunk. Missing keys are tolerated.
#[derive(Debug, Deserialize)]
struct ChunkTranslation {
    full_translation: Option<String>,
    #[serde(default, deserialize_with = "lenient_word_mapping")]
    word_mapping: Vec<WordMapping>,
}

/// Keep every usable mapping entry; a bad entry never discards the chunk
fn lenient_word_mapping<'de, D>(deserializer: D) -> std::result::Result<Vec<WordMapping>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            debug!("Ignoring word_mapping that is not a list: {}", other);
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    let total = entries.len();
    let mappings: Vec<WordMapping> = entries.iter().filter_map(word_mapping_from_value).collect();
    if mappings.len() < total {
        debug!("Dropped {} unusable word_mapping entries", total - mappings.len());
    }
    Ok(mappings)
}

fn word_mapping_from_value(entry: &Value) -> Option<WordMapping> {
    Some(WordMapping {
        original: scalar_to_string(entry.get("original")?)?,
        translated: scalar_to_string(entry.get("translated")?)?,
    })
}

/// Numerals and booleans come back unquoted now and then
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Translates long text chunk by chunk and merges the partial results.
///
/// Chunks are sent one at a time, in order. A chunk whose request fails is
/// echoed untranslated in square brackets and contributes no word mappings;
/// the remaining chunks are still translated.
pub struct ChunkedTranslator {
    client: Arc<dyn CompletionClient>,
    max_chunk_chars: usize,
}

impl ChunkedTranslator {
    pub fn new(client: Arc<dyn CompletionClient>, max_chunk_chars: usize) -> Self {
        Self {
            client,
            max_chunk_chars,
        }
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let chunks = chunk_text(&request.text, self.max_chunk_chars);
        if chunks.is_empty() {
            return Ok(TranslationResult::default());
        }

        let target_lang = request.target_lang.trim();
        if target_lang.is_empty() {
            return Err(GlossaError::InvalidRequest("target_lang must not be empty".to_string()));
        }

        let total_chunks = chunks.len();
        info!("Translating {} chunk(s) to {}", total_chunks, target_lang);

        let mut fragments = Vec::with_capacity(total_chunks);
        let mut word_mapping = Vec::new();
        let mut failed = 0;

        for (idx, chunk) in chunks.iter().enumerate() {
            if chunk.trim().is_empty() {
                continue;
            }

            debug!("Chunk {}/{}: {} chars", idx + 1, total_chunks, chunk.chars().count());

            match self.translate_chunk(chunk, target_lang).await {
                Ok(translation) => {
                    let mappings = translation.word_mapping;
                    info!("Chunk {}/{} translated ({} word mappings)", idx + 1, total_chunks, mappings.len());
                    fragments.push(translation.full_translation.unwrap_or_default());
                    word_mapping.extend(mappings);
                }
                Err(e) => {
                    warn!("Chunk {}/{} failed, keeping original text: {}", idx + 1, total_chunks, e);
                    failed += 1;
                    fragments.push(fallback_fragment(chunk));
                }
            }
        }

        if failed > 0 {
            warn!("{} of {} chunk(s) fell back to the original text", failed, total_chunks);
        }

        Ok(TranslationResult {
            full_translation: fragments.join(" "),
            word_mapping,
        })
    }

    async fn translate_chunk(&self, chunk: &str, target_lang: &str) -> Result<ChunkTranslation> {
        let system_prompt = build_system_prompt(target_lang);
        let content = self.client.complete_json(&system_prompt, chunk).await?;
        parse_chunk_translation(&content)
    }
}

/// Untranslated chunk text marked with square brackets
pub fn fallback_fragment(chunk: &str) -> String {
    format!("[{}]", chunk)
}

fn build_system_prompt(target_lang: &str) -> String {
    format!(
        "You are a professional translator. Translate the user's text into {lang}.\n\
         \n\
         Return ONLY a strictly valid JSON object with exactly two keys:\n\
         1. \"full_translation\": the complete, natural and fluent {lang} translation of the whole text.\n\
         2. \"word_mapping\": a list of objects, one for EVERY word of the source text in the order it appears, \
         each with \"original\" (the word as written in the source text) and \"translated\" \
         (the literal {lang} translation of that word).\n\
         \n\
         The word mapping must be complete. Do not skip, merge, summarize or omit any word, \
         including repeated words, names and short function words.\n\
         Do not include explanations or any text outside the JSON object.",
        lang = target_lang
    )
}

fn parse_chunk_translation(content: &str) -> Result<ChunkTranslation> {
    serde_json::from_str::<ChunkTranslation>(content.trim())
        .map_err(|e| GlossaError::Translation(format!("Model returned malformed JSON: {}", e)))
}
