//! Sentence-aligned text chunking.
//!
//! Long inputs are split into chunks of at most `max_chars` characters so each
//! completion request stays small enough for the model to map every word.
//! Chunks are built from whole sentences; a sentence is never cut in half, so a
//! single sentence longer than the budget becomes its own oversized chunk.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default character budget per chunk
pub const DEFAULT_MAX_CHARS: usize = 600;

/// A terminator followed by the whitespace run that separates it from the next sentence.
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?\n]\s+").expect("sentence boundary pattern is valid"));

/// Split text into sentences at `.`, `!`, `?` or newline followed by whitespace.
///
/// The terminator stays with its sentence and the whitespace run is dropped.
/// Abbreviations ("Dr. Smith") and similar cases are split too.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Terminators are all single-byte ASCII
        let end = boundary.start() + 1;
        push_trimmed(&mut sentences, &text[start..end]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece);
    }
}

/// Group sentences into chunks of at most `max_chars` characters, in order.
///
/// Lengths count characters, including the single space used to join
/// sentences inside a chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();
        let joined_len = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if joined_len > max_chars && !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current_len = sentence_len;
        } else {
            current_len = joined_len;
        }
        current.push(sentence);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_single_short_sentence() {
        assert_eq!(chunk_text("Hello world.", 600), vec!["Hello world."]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(chunk_text("", 600).is_empty());
        assert!(chunk_text("   \n\t  ", 600).is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_no_terminal_punctuation_is_one_chunk() {
        let text = "just some words without any ending";
        assert_eq!(chunk_text(text, 600), vec![text]);
    }

    #[test]
    fn test_two_long_sentences_split_into_two_chunks() {
        let first = format!("{}.", "a".repeat(400));
        let second = format!("{}!", "b".repeat(400));
        let text = format!("{} {}", first, second);

        let chunks = chunk_text(&text, 600);
        assert_eq!(chunks, vec![first, second]);
    }

    #[test]
    fn test_sentences_grouped_under_budget() {
        let text = "One. Two? Three! Four.";
        assert_eq!(chunk_text(text, 600), vec!["One. Two? Three! Four."]);
        assert_eq!(chunk_text(text, 10), vec!["One. Two?", "Three!", "Four."]);
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let long = format!("{}.", "word ".repeat(200).trim_end());
        let text = format!("Short one. {} Tail.", long);

        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "Short one.");
        assert_eq!(chunks[1], long);
        assert_eq!(chunks[2], "Tail.");
    }

    #[test]
    fn test_newline_boundaries() {
        // A lone newline is a boundary only when more whitespace follows it
        let text = "first line\nsecond line\n\nthird paragraph\n  indented";
        assert_eq!(
            split_sentences(text),
            vec!["first line\nsecond line", "third paragraph", "indented"]
        );
    }

    #[test]
    fn test_terminator_without_whitespace_is_not_a_boundary() {
        assert_eq!(split_sentences("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
        assert_eq!(split_sentences("Dr. Smith left."), vec!["Dr.", "Smith left."]);
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        // 5 characters, 15 bytes each
        let text = "ありがとう. こんにちは.";
        let chunks = chunk_text(text, 13);
        assert_eq!(chunks, vec!["ありがとう. こんにちは."]);
    }

    #[test]
    fn test_size_coverage_and_order_properties() {
        let text = "The quick brown fox jumps over the lazy dog. \
                    Pack my box with five dozen liquor jugs!\n\
                    How vexingly quick daft zebras jump? \
                    Sphinx of black quartz, judge my vow. \
                    A wizard's job is to vex chumps quickly in fog.";

        for max_chars in [1, 20, 50, 80, 120, 600] {
            let chunks = chunk_text(text, max_chars);

            for chunk in &chunks {
                assert!(!chunk.trim().is_empty());
                let oversized_single = split_sentences(chunk).len() == 1;
                assert!(chunk.chars().count() <= max_chars || oversized_single);
            }

            assert_eq!(strip_whitespace(&chunks.join(" ")), strip_whitespace(text));
        }
    }
}
