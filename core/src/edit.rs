//! Interactive text tools: whole-word replace and count, prefix completion
//! over word counts, character-set counting and replacement, and removal of a
//! caller-chosen stop-word list.
//!
//! These work on arbitrary text, not on analysis records, and never screen it.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const SUGGESTION_LIMIT: usize = 10;
const STOP_WORD_LIMIT: usize = 10;

/// Case-insensitive whole-word pattern for a literal word. `None` for a blank
/// word.
fn word_regex(word: &str) -> Option<Regex> {
    let word = word.trim();
    if word.is_empty() {
        return None;
    }
    RegexBuilder::new(&format!(r"(?-u:\b){}(?-u:\b)", regex::escape(word)))
        .case_insensitive(true)
        .build()
        .ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordReplacement {
    pub text: String,
    pub count: usize,
}

/// Replace every whole-word, case-insensitive occurrence of `word`.
pub fn replace_word(text: &str, word: &str, replacement: &str) -> WordReplacement {
    let Some(re) = word_regex(word) else {
        return WordReplacement { text: text.to_string(), count: 0 };
    };
    let count = re.find_iter(text).count();
    let replaced = re.replace_all(text, regex::NoExpand(replacement)).into_owned();
    debug!(word, count, "word replaced");
    WordReplacement { text: replaced, count }
}

pub fn count_word(text: &str, word: &str) -> usize {
    word_regex(word).map_or(0, |re| re.find_iter(text).count())
}

/// Lowercased ASCII word tokens; any other char separates words.
fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Words of `text` starting with `prefix`, most frequent first, ties
/// alphabetical, at most ten.
pub fn suggest_words(text: &str, prefix: &str) -> Vec<(String, usize)> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for word in word_tokens(text).filter(|w| w.starts_with(&prefix)) {
        *counts.entry(word).or_insert(0) += 1;
    }
    crate::frequency::top_words(&counts, SUGGESTION_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharCount {
    pub character: char,
    pub count: usize,
    /// Share of all chars in the text, rounded to two decimals.
    pub percentage: f64,
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive count of each distinct char of `set`, in `set` order.
pub fn count_characters(text: &str, set: &str) -> Vec<CharCount> {
    let total = text.chars().count();
    let mut out: Vec<CharCount> = Vec::new();
    for target in set.chars() {
        if out.iter().any(|c| c.character == target) {
            continue;
        }
        let count = text.chars().filter(|c| same_letter(*c, target)).count();
        let percentage = if total == 0 { 0.0 } else { (count as f64 / total as f64 * 10000.0).round() / 100.0 };
        out.push(CharCount { character: target, count, percentage });
    }
    out
}

/// Replace every char of `set` (case-insensitively) with `replacement`.
///
/// The set is applied one char at a time, so a replacement that itself
/// contains a later char of the set is rewritten again.
pub fn replace_characters(text: &str, set: &str, replacement: &str) -> String {
    let mut current = text.to_string();
    for target in set.chars() {
        let mut next = String::with_capacity(current.len());
        for c in current.chars() {
            if same_letter(c, target) {
                next.push_str(replacement);
            } else {
                next.push(c);
            }
        }
        current = next;
    }
    current
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopWordRemoval {
    /// The list actually applied: lowercased, blanks dropped, at most ten.
    pub stop_words: Vec<String>,
    /// Removed words with their counts, most removed first.
    pub removed: Vec<(String, usize)>,
    pub total_removed: usize,
    pub original_count: usize,
    pub final_count: usize,
    /// `total_removed` as a share of `original_count`, two decimals.
    pub percentage_removed: f64,
    /// Remaining tokens joined by single spaces.
    pub text: String,
}

/// Parse a comma-separated stop-word list.
pub fn parse_stop_words(list: &str) -> Vec<String> {
    list.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .take(STOP_WORD_LIMIT)
        .collect()
}

/// Drop whitespace-separated tokens whose lowercased word chars equal one of
/// `stop_words` (punctuation is ignored for the comparison only).
pub fn remove_stop_words(text: &str, stop_words: &[String]) -> StopWordRemoval {
    let stop_words: Vec<String> = stop_words.iter().take(STOP_WORD_LIMIT).cloned().collect();
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let mut removed: BTreeMap<String, usize> = BTreeMap::new();
    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let bare: String = token
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_ascii_lowercase();
        if stop_words.contains(&bare) {
            *removed.entry(bare).or_insert(0) += 1;
        } else {
            kept.push(token);
        }
    }

    let total_removed: usize = removed.values().sum();
    let original_count = tokens.len();
    let percentage_removed = if original_count == 0 {
        0.0
    } else {
        (total_removed as f64 / original_count as f64 * 10000.0).round() / 100.0
    };
    StopWordRemoval {
        removed: crate::frequency::top_words(&removed, removed.len()),
        stop_words,
        total_removed,
        original_count,
        final_count: kept.len(),
        percentage_removed,
        text: kept.join(" "),
    }
}
