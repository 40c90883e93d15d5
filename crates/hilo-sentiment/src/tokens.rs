//! Sentence splitting and tokenization shared by both scoring modes.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::normalize_key;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?…\n]+").expect("valid regex"));

/// Word runs, or any single non-ASCII glyph that is neither a word character,
/// whitespace nor punctuation (emoji, currency symbols).
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\x00-\x7F\w\s\p{P}]").expect("valid regex"));

/// Non-empty sentences of `text`.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Lowercase tokens of one sentence, with emoji presentation marks removed.
#[must_use]
pub fn tokenize(sentence: &str) -> Vec<String> {
    let cleaned = normalize_key(sentence);
    TOKEN
        .find_iter(&cleaned)
        .map(|m| m.as_str().to_string())
        .collect()
}
