use crate::language::Language;
use crate::stopwords::StopWordSets;
use tracing::debug;

/// Split cleaned text into words, dropping single-char tokens and the stop
/// words of `language` (English ones when the language is undetermined).
/// Corpus order is preserved.
pub fn tokenize(cleaned: &str, language: &Language, stop_words: &StopWordSets) -> Vec<String> {
    let mut seen = 0usize;
    let words: Vec<String> = cleaned
        .split_whitespace()
        .inspect(|_| seen += 1)
        .filter(|token| token.chars().count() > 1)
        .filter(|token| !stop_words.is_stop_word(language, token))
        .map(str::to_string)
        .collect();
    debug!(language = language.name(), tokens = seen, kept = words.len(), "tokenized");
    words
}
