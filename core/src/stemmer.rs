//! Rule-based suffix stemmer.
//!
//! One ordered table drives both directions: [`stem`] strips at most one
//! suffix, and [`inflections`] regenerates the surface forms a stem can come
//! from, which the search engine uses for stemmed terms.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

struct SuffixRule {
    suffix: &'static str,
    replacement: &'static str,
    /// Minimum length (in chars) of the rewritten word for the rule to apply.
    min_len: Option<usize>,
}

const fn rule(suffix: &'static str, replacement: &'static str) -> SuffixRule {
    SuffixRule { suffix, replacement, min_len: None }
}

const fn rule_min(suffix: &'static str, replacement: &'static str, min_len: usize) -> SuffixRule {
    SuffixRule { suffix, replacement, min_len: Some(min_len) }
}

/// Evaluated top to bottom; the first rule that matches and satisfies its
/// minimum wins.
const RULES: &[SuffixRule] = &[
    rule("ies", "y"),
    rule("ied", "y"),
    rule_min("s", "", 4),
    rule("eed", "ee"),
    rule_min("ed", "", 4),
    rule_min("ing", "", 4),
    rule_min("est", "", 4),
    rule_min("er", "", 4),
    rule_min("ly", "", 4),
    rule("tion", "te"),
    rule("sion", "s"),
    rule("ness", ""),
    rule("ment", ""),
    rule("able", ""),
    rule("ible", ""),
    rule("ful", ""),
    rule("less", ""),
    rule("ous", ""),
    rule("ive", ""),
    rule("ize", ""),
    rule("ise", ""),
];

impl SuffixRule {
    fn apply(&self, word: &str) -> Option<String> {
        let base = word.strip_suffix(self.suffix)?;
        let candidate = format!("{base}{}", self.replacement);
        match self.min_len {
            Some(min) if candidate.chars().count() < min => None,
            _ => Some(candidate),
        }
    }
}

/// Lowercase without changing the char count (first lowercase mapping only).
fn fold_case(word: &str) -> String {
    word.chars().map(|c| c.to_lowercase().next().unwrap_or(c)).collect()
}

/// Reduce a word to its approximate root.
///
/// Words of two chars or fewer come back untouched. Otherwise the word is
/// lowercased, at most one suffix rule is applied, and a trailing doubled
/// letter is collapsed when more than three chars remain (`runn` -> `run`).
pub fn stem(word: &str) -> String {
    if word.chars().count() <= 2 {
        return word.to_string();
    }
    let lower = fold_case(word);
    let mut stemmed = RULES.iter().find_map(|r| r.apply(&lower)).unwrap_or(lower);

    if stemmed.chars().count() > 3 {
        let mut tail = stemmed.chars().rev();
        if let (Some(last), Some(prev)) = (tail.next(), tail.next()) {
            if last == prev {
                stemmed.pop();
            }
        }
    }
    stemmed
}

pub fn stem_words<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words.iter().map(|w| stem(w.as_ref())).collect()
}

/// The stem itself plus every single-suffix form the rule table can derive it
/// from, ignoring minimum lengths. Forms with the final letter doubled are
/// generated too, so `run` yields `running` as well as `runs`, and `bel`
/// yields `bell`.
pub fn inflections(stem: &str) -> Vec<String> {
    let mut forms = vec![stem.to_string()];
    let last = stem.chars().last();
    if let Some(last) = last {
        forms.push(format!("{stem}{last}"));
    }
    let mut push = |form: String| {
        if !forms.contains(&form) {
            forms.push(form);
        }
    };
    for rule in RULES {
        let Some(base) = stem.strip_suffix(rule.replacement) else { continue };
        if base.is_empty() {
            continue;
        }
        push(format!("{base}{}", rule.suffix));
        if rule.replacement.is_empty() {
            if let Some(last) = last {
                push(format!("{stem}{last}{}", rule.suffix));
            }
        }
    }
    forms
}

/// Original and stemmed token counts for a text, with the stem -> originals
/// mapping that explains how variants were grouped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StemmedIndex {
    pub original: BTreeMap<String, usize>,
    pub stemmed: BTreeMap<String, usize>,
    pub mapping: BTreeMap<String, BTreeSet<String>>,
}

impl StemmedIndex {
    /// Index every ASCII word token longer than two chars.
    pub fn from_text(text: &str) -> Self {
        let lowered: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
            .collect();

        let mut index = StemmedIndex::default();
        for word in lowered.split_whitespace().filter(|w| w.chars().count() > 2) {
            *index.original.entry(word.to_string()).or_insert(0) += 1;
            let root = stem(word);
            *index.stemmed.entry(root.clone()).or_insert(0) += 1;
            index.mapping.entry(root).or_default().insert(word.to_string());
        }
        index
    }
}
