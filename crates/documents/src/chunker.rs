//! Sentence-packing chunker.
//!
//! Text is split after `.`, `!` or `?` when followed by whitespace, and the
//! resulting sentences are packed greedily into chunks of at most
//! `max_chars` characters, joined by single spaces. A sentence longer than
//! the limit becomes a chunk of its own; sentences are never cut.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Default soft limit on chunk length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 500;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence break regex is valid"));

/// Packs document text into bounded-length chunks.
#[derive(Debug, Clone)]
pub struct Chunker {
    max_chars: usize,
}

impl Chunker {
    /// A zero limit is treated as 1, so every sentence becomes its own chunk.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Chunk text into document-ordered pieces.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut buffer_chars = 0usize;

        for sentence in split_sentences(text) {
            let sentence_chars = sentence.chars().count();

            if buffer.is_empty() {
                buffer.push_str(sentence);
                buffer_chars = sentence_chars;
                continue;
            }

            if buffer_chars + 1 + sentence_chars <= self.max_chars {
                buffer.push(' ');
                buffer.push_str(sentence);
                buffer_chars += 1 + sentence_chars;
            } else {
                flush(&mut chunks, &buffer);
                buffer.clear();
                buffer.push_str(sentence);
                buffer_chars = sentence_chars;
            }
        }
        flush(&mut chunks, &buffer);

        debug!(
            input_chars = text.len(),
            chunks = chunks.len(),
            max_chars = self.max_chars,
            "Chunked document"
        );
        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

/// Chunk `text` with the given limit.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    Chunker::new(max_chars).chunk(text)
}

/// Split text into sentence-like segments.
///
/// The terminating punctuation stays with its sentence; the whitespace run
/// after it is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BREAK.find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        sentences.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

fn flush(chunks: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "Hi there. This is a test sentence for chunking purposes. Another one follows here.";

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 500).is_empty());
        assert!(chunk_text("   \n\t ", 500).is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(chunk_text(SAMPLE, 500), vec![SAMPLE.to_string()]);
    }

    #[test]
    fn sentences_pack_up_to_the_limit() {
        let chunks = chunk_text(SAMPLE, 40);
        assert_eq!(
            chunks,
            vec![
                "Hi there.",
                "This is a test sentence for chunking purposes.",
                "Another one follows here.",
            ]
        );
    }

    #[test]
    fn exact_fit_stays_in_one_chunk() {
        // "One. Two." is 9 characters.
        assert_eq!(chunk_text("One. Two.", 9), vec!["One. Two."]);
        assert_eq!(chunk_text("One. Two.", 8), vec!["One.", "Two."]);
    }

    #[test]
    fn oversized_sentence_is_emitted_whole() {
        let long = "This sentence is far longer than the tiny limit allows.";
        let chunks = chunk_text(&format!("{long} Ok."), 10);
        assert_eq!(chunks, vec![long, "Ok."]);
    }

    #[test]
    fn oversized_first_sentence_does_not_emit_empty_chunk() {
        let chunks = chunk_text("Supercalifragilistic. A.", 5);
        assert_eq!(chunks, vec!["Supercalifragilistic.", "A."]);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn split_consumes_whitespace_runs_after_punctuation() {
        let sentences = split_sentences("Wait!   Really?\nYes.\tDone");
        assert_eq!(sentences, vec!["Wait!", "Really?", "Yes.", "Done"]);
    }

    #[test]
    fn punctuation_without_whitespace_does_not_split() {
        assert_eq!(split_sentences("Version 1.2 is out.See"), vec!["Version 1.2 is out.See"]);
        assert_eq!(split_sentences("e.g. this"), vec!["e.g.", "this"]);
    }

    #[test]
    fn trailing_whitespace_adds_no_segment() {
        assert_eq!(split_sentences("End. "), vec!["End."]);
    }

    #[test]
    fn length_is_measured_in_characters() {
        // Ten characters, fourteen bytes.
        let chunks = chunk_text("Ünïc. Ödë!", 11);
        assert_eq!(chunks, vec!["Ünïc. Ödë!"]);
    }

    #[test]
    fn chunks_reconstruct_sentence_sequence() {
        let text = "Alpha beta.  Gamma delta!\nEpsilon? Zeta eta theta. Iota";
        for max in [1, 5, 12, 20, 80] {
            let chunks = chunk_text(text, max);
            assert_eq!(chunks.join(" "), split_sentences(text).join(" "));
            for chunk in &chunks {
                assert!(!chunk.is_empty());
                let single_sentence = split_sentences(chunk).len() == 1;
                assert!(chunk.chars().count() <= max || single_sentence);
            }
        }
    }

    #[test]
    fn zero_limit_is_clamped() {
        let chunker = Chunker::new(0);
        assert_eq!(chunker.max_chars(), 1);
        assert_eq!(chunker.chunk("A. B."), vec!["A.", "B."]);
    }
}
