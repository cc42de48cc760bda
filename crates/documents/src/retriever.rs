//! Lexical-overlap retrieval.
//!
//! A chunk's score is the number of distinct lowercase word tokens it shares
//! with the query. No stemming, no term frequency, no partial matches.
//! Ties keep document order.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Default number of chunks placed in a prompt.
pub const DEFAULT_TOP_K: usize = 3;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word regex is valid"));

/// A chunk together with its overlap score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredChunk<'a> {
    /// Position of the chunk in the document.
    pub index: usize,
    /// Number of query tokens present in the chunk.
    pub score: usize,
    pub text: &'a str,
}

/// Distinct lowercase `\w+` tokens of `text`.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Score every chunk with a non-zero overlap, best first.
pub fn score_chunks<'a, S: AsRef<str>>(query: &str, chunks: &'a [S]) -> Vec<ScoredChunk<'a>> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredChunk<'a>> = chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let text = chunk.as_ref();
            let score = tokenize(text).intersection(&query_tokens).count();
            ScoredChunk { index, score, text }
        })
        .filter(|c| c.score > 0)
        .collect();

    // `sort_by` is stable, so equal scores stay in document order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Return up to `top_k` chunks that share at least one token with `query`.
pub fn search<S: AsRef<str>>(query: &str, chunks: &[S], top_k: usize) -> Vec<String> {
    score_chunks(query, chunks)
        .into_iter()
        .take(top_k)
        .map(|c| c.text.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER: [&str; 3] = [
        "The weather is sunny.",
        "I like pizza.",
        "Forecast shows rain tomorrow.",
    ];

    #[test]
    fn tokenize_lowercases_and_dedupes() {
        let tokens = tokenize("Rain, rain: go_away! RAIN 42");
        let expected: HashSet<String> = ["rain", "go_away", "42"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn tokenize_handles_unicode_words() {
        let tokens = tokenize("Café Über naïve");
        assert!(tokens.contains("café"));
        assert!(tokens.contains("über"));
        assert!(tokens.contains("naïve"));
    }

    #[test]
    fn matching_chunks_in_document_order() {
        let result = search("weather forecast", &WEATHER, 2);
        assert_eq!(
            result,
            vec!["The weather is sunny.", "Forecast shows rain tomorrow."]
        );
    }

    #[test]
    fn higher_scores_come_first() {
        let chunks = [
            "rain once",
            "nothing here",
            "rain tomorrow in the city",
            "tomorrow",
        ];
        let scored = score_chunks("rain tomorrow city", &chunks);
        let order: Vec<usize> = scored.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![2, 0, 3]);
        assert_eq!(scored[0].score, 3);
    }

    #[test]
    fn zero_overlap_never_returned() {
        let result = search("pizza", &WEATHER, 10);
        assert_eq!(result, vec!["I like pizza."]);
        assert!(search("volcano", &WEATHER, 10).is_empty());
    }

    #[test]
    fn repeated_tokens_count_once() {
        let chunks = ["rain rain rain", "rain snow"];
        let scored = score_chunks("rain snow", &chunks);
        assert_eq!(scored[0].index, 1);
        assert_eq!(scored[0].score, 2);
        assert_eq!(scored[1].score, 1);
    }

    #[test]
    fn no_partial_matches() {
        assert!(search("rain", &["raining heavily"], 3).is_empty());
    }

    #[test]
    fn top_k_bounds_result() {
        let chunks = ["a x", "a y", "a z"];
        assert_eq!(search("a", &chunks, 0), Vec::<String>::new());
        assert_eq!(search("a", &chunks, 2), vec!["a x", "a y"]);
        assert_eq!(search("a", &chunks, 10).len(), 3);
    }

    #[test]
    fn empty_inputs() {
        let none: [&str; 0] = [];
        assert!(search("anything", &none, 3).is_empty());
        assert!(search("", &WEATHER, 3).is_empty());
        assert!(search("?!", &WEATHER, 3).is_empty());
    }

    #[test]
    fn search_is_deterministic() {
        let chunks: Vec<String> = (0..20).map(|i| format!("chunk {i} shares words")).collect();
        let first = search("shares words", &chunks, 5);
        let second = search("shares words", &chunks, 5);
        assert_eq!(first, second);
        assert_eq!(first[0], "chunk 0 shares words");
    }
}
