//! The per-document analysis record and the pipeline that builds it.

use crate::error::InvalidInputError;
use crate::frequency::{self, ForeignChar};
use crate::language::{detect_language, Language};
use crate::normalizer::{clean, screen};
use crate::stopwords::{StopWordSets, DEFAULT_STOP_WORDS};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_document_id(now: OffsetDateTime) -> String {
    let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("doc_{}_{seq}", now.unix_timestamp_nanos() / 1_000_000)
}

/// Linguistic profile of one document. Built once by [`Analyzer::analyze`]
/// and read-only afterwards; re-analysing the same text yields a new record
/// with a new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    id: String,
    name: String,
    created_at: String,
    original_content: String,
    cleaned_text: String,
    language: Language,
    words: Vec<String>,
    word_frequency: BTreeMap<String, usize>,
    letter_frequency: BTreeMap<char, f64>,
    char_frequency: BTreeMap<char, usize>,
    foreign_chars: Vec<ForeignChar>,
    word_count: usize,
    average_word_length: f64,
}

impl AnalysisRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// RFC 3339, UTC.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// The input exactly as supplied; all search offsets point into it.
    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Tokens in corpus order, stop words and single chars removed.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_frequency(&self) -> &BTreeMap<String, usize> {
        &self.word_frequency
    }

    pub fn letter_frequency(&self) -> &BTreeMap<char, f64> {
        &self.letter_frequency
    }

    pub fn char_frequency(&self) -> &BTreeMap<char, usize> {
        &self.char_frequency
    }

    pub fn foreign_chars(&self) -> &[ForeignChar] {
        &self.foreign_chars
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn average_word_length(&self) -> f64 {
        self.average_word_length
    }

    pub fn top_words(&self, n: usize) -> Vec<(String, usize)> {
        frequency::top_words(&self.word_frequency, n)
    }
}

/// Runs the analysis pipeline against a fixed set of stop words.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    stop_words: &'a StopWordSets,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self { stop_words: &DEFAULT_STOP_WORDS }
    }
}

impl<'a> Analyzer<'a> {
    pub fn new(stop_words: &'a StopWordSets) -> Self {
        Self { stop_words }
    }

    pub fn stop_words(&self) -> &'a StopWordSets {
        self.stop_words
    }

    /// Screen, clean, detect, tokenize, and count. The screen runs first, on
    /// the original text; a rejection ends processing for this document.
    pub fn analyze(&self, name: &str, text: &str) -> Result<AnalysisRecord, InvalidInputError> {
        screen(text)?;

        let foreign_chars = frequency::foreign_chars(text);
        let letter_frequency = frequency::letter_frequency(text);
        let cleaned_text = clean(text);
        let language = detect_language(&cleaned_text, &letter_frequency, &foreign_chars);
        let words = tokenize(&cleaned_text, &language, self.stop_words);
        let word_frequency = frequency::word_frequency(&words);
        let char_frequency = frequency::char_frequency(&cleaned_text);
        let average_word_length = frequency::average_word_length(&words);

        let now = OffsetDateTime::now_utc();
        let record = AnalysisRecord {
            id: next_document_id(now),
            name: name.to_string(),
            created_at: now.format(&Rfc3339).unwrap_or_else(|_| "".into()),
            original_content: text.to_string(),
            cleaned_text,
            language,
            word_count: words.len(),
            words,
            word_frequency,
            letter_frequency,
            char_frequency,
            foreign_chars,
            average_word_length,
        };
        info!(id = %record.id, name, language = %record.language, words = record.word_count, "document analyzed");
        Ok(record)
    }
}

/// Analyse with the built-in stop-word sets.
pub fn build_analysis_record(name: &str, text: &str) -> Result<AnalysisRecord, InvalidInputError> {
    Analyzer::default().analyze(name, text)
}
