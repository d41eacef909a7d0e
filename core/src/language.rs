//! Language detection for English, French, and Spanish.
//!
//! Detection is a fixed sequence of stages. Each stage either returns a
//! confident verdict or passes; the first verdict wins and the fallback only
//! runs when every stage passed.
//!
//! 1. letter-frequency signature over the original content
//! 2. accented-character signature
//! 3. common-word overlap on the cleaned text
//! 4. fallback: [`Language::Undetermined`] with a reason

use crate::frequency::ForeignChar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

const ACCENT_THRESHOLD: usize = 10;
const SPANISH_ACCENTS: &[char] = &['ñ'];
const FRENCH_ACCENTS: &[char] = &['ç', 'è', 'ê', 'ë', 'à', 'â', 'ù', 'û', 'ÿ'];

const MIN_WORD_SCORE: usize = 3;
const WORD_SCORE_MARGIN: usize = 2;
const COMMON_ENGLISH: &[&str] = &["the", "and", "of", "to", "a", "in", "for", "is", "on", "that"];
const COMMON_FRENCH: &[&str] = &["le", "de", "et", "un", "à", "être", "ce", "il", "que", "ne"];
const COMMON_SPANISH: &[&str] = &[
    "el", "de", "que", "y", "a", "en", "un", "es", "se", "no", "te", "lo", "le", "da", "su", "por",
    "son", "con", "para", "al",
];

const CORRUPTION_RATIO: f64 = 0.1;
pub const REASON_CORRUPTION: &str = "possible file corruption or unsupported encoding";
pub const REASON_INSUFFICIENT: &str = "insufficient linguistic patterns";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "language", content = "reason")]
pub enum Language {
    English,
    French,
    Spanish,
    /// Not an error: analysis continues with English stop words.
    Undetermined(String),
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Undetermined(_) => "Undetermined",
        }
    }

    pub fn is_determined(&self) -> bool {
        !matches!(self, Language::Undetermined(_))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Undetermined(reason) => write!(f, "Language cannot be detected - {reason}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Everything the stages look at, computed once by the caller.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub cleaned: &'a str,
    pub letters: &'a BTreeMap<char, f64>,
    pub foreign: &'a [ForeignChar],
}

impl Evidence<'_> {
    fn pct(&self, letter: char) -> f64 {
        self.letters.get(&letter).copied().unwrap_or(0.0)
    }

    fn accent_count(&self, set: &[char]) -> usize {
        self.foreign
            .iter()
            .filter(|fc| fc.character.to_lowercase().any(|c| set.contains(&c)))
            .map(|fc| fc.count)
            .sum()
    }
}

type Stage = fn(&Evidence<'_>) -> Option<Language>;

const STAGES: [(&str, Stage); 3] = [
    ("letter-frequency", letter_signature),
    ("accented-characters", accent_signature),
    ("common-words", common_word_overlap),
];

/// Classify text. `letters` must come from the original content and
/// `cleaned` from [`crate::normalizer::clean`].
pub fn detect_language(cleaned: &str, letters: &BTreeMap<char, f64>, foreign: &[ForeignChar]) -> Language {
    let evidence = Evidence { cleaned, letters, foreign };
    for (name, stage) in STAGES {
        if let Some(language) = stage(&evidence) {
            debug!(stage = name, %language, "language detected");
            return language;
        }
        debug!(stage = name, "stage inconclusive");
    }
    fallback(&evidence)
}

/// Bands are checked in the order French, English, Spanish.
pub fn letter_signature(ev: &Evidence<'_>) -> Option<Language> {
    let (e, a, t, o, r, s) = (ev.pct('e'), ev.pct('a'), ev.pct('t'), ev.pct('o'), ev.pct('r'), ev.pct('s'));
    if e > 13.5 && a > 7.0 && a < 9.5 && r > 5.5 {
        return Some(Language::French);
    }
    if e > 11.0 && e < 14.0 && t > 8.5 && a > 7.5 && a < 9.5 {
        return Some(Language::English);
    }
    if a > 10.5 && o > 7.5 && s > 6.5 {
        return Some(Language::Spanish);
    }
    None
}

pub fn accent_signature(ev: &Evidence<'_>) -> Option<Language> {
    let spanish = ev.accent_count(SPANISH_ACCENTS);
    if spanish >= ACCENT_THRESHOLD {
        return Some(Language::Spanish);
    }
    let french = ev.accent_count(FRENCH_ACCENTS);
    if french >= ACCENT_THRESHOLD {
        return Some(Language::French);
    }
    if spanish > 0 || french > 0 {
        debug!(spanish, french, "accented characters below threshold");
    }
    None
}

fn word_score(cleaned: &str, common: &[&str]) -> usize {
    cleaned.split_whitespace().filter(|token| common.contains(token)).count()
}

/// A language wins with at least [`MIN_WORD_SCORE`] hits and a lead of
/// [`WORD_SCORE_MARGIN`] over each other language.
pub fn common_word_overlap(ev: &Evidence<'_>) -> Option<Language> {
    let scores = [
        (Language::English, word_score(ev.cleaned, COMMON_ENGLISH)),
        (Language::French, word_score(ev.cleaned, COMMON_FRENCH)),
        (Language::Spanish, word_score(ev.cleaned, COMMON_SPANISH)),
    ];
    debug!(english = scores[0].1, french = scores[1].1, spanish = scores[2].1, "common word scores");

    scores.iter().enumerate().find_map(|(i, (language, score))| {
        let leads = scores
            .iter()
            .enumerate()
            .all(|(j, (_, other))| i == j || *score >= other + WORD_SCORE_MARGIN);
        (*score >= MIN_WORD_SCORE && leads).then(|| language.clone())
    })
}

fn fallback(ev: &Evidence<'_>) -> Language {
    let accented: usize = ev.foreign.iter().map(|fc| fc.count).sum();
    let length = ev.cleaned.chars().count();
    if accented > 0 && accented as f64 > length as f64 * CORRUPTION_RATIO {
        Language::Undetermined(REASON_CORRUPTION.to_string())
    } else {
        Language::Undetermined(REASON_INSUFFICIENT.to_string())
    }
}
