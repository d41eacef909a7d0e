//! Query expansion and two-pass matching over a corpus of analysis records.
//!
//! A raw query becomes a list of [`QueryTerm`]s: each plain token is searched
//! as written and, when stemming changes it, as a stem that also matches the
//! stem's regular inflections. Tokens containing `*` are wildcards.
//!
//! Matching runs twice per record. The first pass checks the cleaned text to
//! decide which terms are present at all. The second pass re-runs the present
//! terms against the original content, because cleaning collapses punctuation
//! and digits and so offsets in the cleaned text do not map back. Every
//! reported position and context therefore refers to the original content.
//!
//! Word boundaries are ASCII-only: accented letters count as separators, the
//! same way cleaning treats them, so `caf` is found inside `café`.

use crate::document::AnalysisRecord;
use crate::stemmer::{inflections, stem};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

const MIN_QUERY_TOKEN: usize = 3;
const MIN_STEM_LEN: usize = 3;
const CONTEXT_CHARS: usize = 50;

const BOUNDARY: &str = r"(?-u:\b)";
const WORD_CHARS: &str = "[0-9A-Za-z_]*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Exact,
    Stemmed,
    Wildcard,
}

/// One expanded search term. `original` is the sanitised query token it came
/// from, `term` the string actually searched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTerm {
    pub original: String,
    pub term: String,
    pub kind: TermKind,
}

impl QueryTerm {
    /// Case-insensitive pattern anchored on ASCII word boundaries.
    pub fn pattern(&self) -> String {
        let body = match self.kind {
            TermKind::Exact => regex::escape(&self.term),
            TermKind::Stemmed => {
                let forms: Vec<String> = inflections(&self.term).iter().map(|f| regex::escape(f)).collect();
                format!("(?:{})", forms.join("|"))
            }
            TermKind::Wildcard => {
                let pieces: Vec<String> = self.term.split('*').map(regex::escape).collect();
                pieces.join(WORD_CHARS)
            }
        };
        format!("(?i){BOUNDARY}{body}{BOUNDARY}")
    }

    pub fn regex(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.pattern())
    }
}

/// Keep ASCII word characters and `*`.
fn sanitize(token: &str) -> String {
    token.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '*').collect()
}

/// Expand a raw query into ordered search terms.
///
/// Tokens shorter than three chars are dropped, before and after stripping
/// punctuation. A wildcard token needs at least one non-`*` char.
pub fn expand_query(raw: &str) -> Vec<QueryTerm> {
    let mut terms = Vec::new();
    for token in raw.to_lowercase().split_whitespace() {
        if token.chars().count() < MIN_QUERY_TOKEN {
            continue;
        }
        let token = sanitize(token);
        if token.chars().count() < MIN_QUERY_TOKEN {
            continue;
        }
        if token.contains('*') {
            if token.chars().all(|c| c == '*') {
                continue;
            }
            terms.push(QueryTerm { original: token.clone(), term: token, kind: TermKind::Wildcard });
            continue;
        }
        let stemmed = stem(&token);
        terms.push(QueryTerm { original: token.clone(), term: token.clone(), kind: TermKind::Exact });
        if stemmed != token && stemmed.chars().count() >= MIN_STEM_LEN {
            terms.push(QueryTerm { original: token, term: stemmed, kind: TermKind::Stemmed });
        }
    }
    terms
}

/// One located occurrence. `position` is a byte offset into the record's
/// original content; `context` spans up to 50 chars either side of the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub term: String,
    pub position: usize,
    pub matched_text: String,
    pub context: String,
    pub is_wildcard: bool,
}

impl SearchMatch {
    pub fn end(&self) -> usize {
        self.position + self.matched_text.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    pub record: &'a AnalysisRecord,
    pub matches: Vec<SearchMatch>,
}

/// A compiled query, reusable across corpora.
#[derive(Debug, Clone)]
pub struct Query {
    compiled: Vec<(QueryTerm, Regex)>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let compiled = expand_query(raw)
            .into_iter()
            .filter_map(|term| match term.regex() {
                Ok(re) => Some((term, re)),
                Err(err) => {
                    warn!(term = %term.term, error = %err, "skipping uncompilable search term");
                    None
                }
            })
            .collect();
        Self { compiled }
    }

    pub fn terms(&self) -> impl Iterator<Item = &QueryTerm> {
        self.compiled.iter().map(|(term, _)| term)
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Results in corpus order. A record is included when some term occurs in
    /// its cleaned text (or its original content when nothing survived
    /// cleaning) and the second pass locates at least one match.
    pub fn run<'a>(&self, corpus: &'a [AnalysisRecord]) -> Vec<SearchResult<'a>> {
        corpus.iter().filter_map(|record| self.match_record(record)).collect()
    }

    fn match_record<'a>(&self, record: &'a AnalysisRecord) -> Option<SearchResult<'a>> {
        let haystack = if record.cleaned_text().is_empty() {
            record.original_content()
        } else {
            record.cleaned_text()
        };
        let present: Vec<&(QueryTerm, Regex)> =
            self.compiled.iter().filter(|(_, re)| re.is_match(haystack)).collect();
        if present.is_empty() {
            return None;
        }
        let matches = locate(record.original_content(), &present);
        if matches.is_empty() {
            debug!(id = record.id(), terms = present.len(), "cleaned-text hit has no counterpart in the original");
            return None;
        }
        debug!(id = record.id(), terms = present.len(), matches = matches.len(), "record matched");
        Some(SearchResult { record, matches })
    }

    /// Occurrence counts per term in `text`, in term order.
    pub fn summary(&self, text: &str) -> Vec<MatchSummary> {
        self.compiled
            .iter()
            .map(|(term, re)| MatchSummary {
                term: term.term.clone(),
                kind: term.kind,
                occurrences: re.find_iter(text).count(),
            })
            .collect()
    }
}

/// Second pass: positions in the original content, sorted by position.
///
/// Where several terms hit the same span (an exact word is also one of its
/// stem's inflections) only the first term in query order is kept.
fn locate(original: &str, present: &[&(QueryTerm, Regex)]) -> Vec<SearchMatch> {
    let mut matches: Vec<SearchMatch> = present
        .iter()
        .flat_map(|(term, re)| {
            re.find_iter(original).map(move |m| SearchMatch {
                term: term.term.clone(),
                position: m.start(),
                matched_text: m.as_str().to_string(),
                context: context_around(original, m.start(), m.end()).to_string(),
                is_wildcard: term.kind == TermKind::Wildcard,
            })
        })
        .collect();
    matches.sort_by_key(|m| m.position);
    let mut seen = HashSet::new();
    matches.retain(|m| seen.insert((m.position, m.end())));
    matches
}

/// Byte range of the context window around `start..end`: up to 50 chars on
/// either side.
pub fn context_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let from = text[..start].char_indices().rev().nth(CONTEXT_CHARS - 1).map_or(0, |(i, _)| i);
    let to = text[end..].char_indices().nth(CONTEXT_CHARS).map_or(text.len(), |(i, _)| end + i);
    (from, to)
}

fn context_around(text: &str, start: usize, end: usize) -> &str {
    let (from, to) = context_bounds(text, start, end);
    &text[from..to]
}

/// Search a corpus with a raw query string.
pub fn search<'a>(corpus: &'a [AnalysisRecord], raw_query: &str) -> Vec<SearchResult<'a>> {
    Query::parse(raw_query).run(corpus)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub term: String,
    pub kind: TermKind,
    pub occurrences: usize,
}

pub fn match_summary(text: &str, raw_query: &str) -> Vec<MatchSummary> {
    Query::parse(raw_query).summary(text)
}

/// Wrap each match span of `text` in `open`/`close`. Spans overlapping an
/// earlier one are skipped.
pub fn highlight(text: &str, matches: &[SearchMatch], open: &str, close: &str) -> String {
    let mut spans: Vec<(usize, usize)> = matches
        .iter()
        .map(|m| (m.position, m.end()))
        .filter(|(start, end)| *end <= text.len() && text.is_char_boundary(*start) && text.is_char_boundary(*end))
        .collect();
    spans.sort_unstable();

    let mut out = String::with_capacity(text.len() + spans.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for (start, end) in spans {
        if start < cursor {
            continue;
        }
        out.push_str(&text[cursor..start]);
        out.push_str(open);
        out.push_str(&text[start..end]);
        out.push_str(close);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_analysis_record;

    fn kinds(terms: &[QueryTerm]) -> Vec<(&str, TermKind)> {
        terms.iter().map(|t| (t.term.as_str(), t.kind)).collect()
    }

    #[test]
    fn expansion_adds_stems_and_keeps_wildcards() {
        let terms = expand_query("Running, at the CATS run*");
        assert_eq!(
            kinds(&terms),
            vec![
                ("running", TermKind::Exact),
                ("run", TermKind::Stemmed),
                ("the", TermKind::Exact),
                ("cats", TermKind::Exact),
                ("run*", TermKind::Wildcard),
            ]
        );
        assert_eq!(terms[1].original, "running");
    }

    #[test]
    fn expansion_drops_degenerate_tokens() {
        assert!(expand_query("a an ... *** ?!?").is_empty());
        assert!(expand_query("").is_empty());
    }

    #[test]
    fn wildcard_is_word_anchored() {
        let term = QueryTerm { original: "run*".into(), term: "run*".into(), kind: TermKind::Wildcard };
        let re = term.regex().unwrap();
        for word in ["running", "runs", "run", "RUN"] {
            assert!(re.is_match(word), "{word}");
        }
        assert!(!re.is_match("overrun"));
    }

    #[test]
    fn wildcard_escapes_metacharacters() {
        let term = QueryTerm { original: "c.t*".into(), term: "c.t*".into(), kind: TermKind::Wildcard };
        let re = term.regex().unwrap();
        assert!(re.is_match("c.tty"));
        assert!(!re.is_match("cat"));
    }

    #[test]
    fn positions_and_context_come_from_the_original() {
        let text = "Intro -- 42 RUNNING dogs!";
        let record = build_analysis_record("doc", text).unwrap();
        let corpus = [record];
        let results = search(&corpus, "running");
        assert_eq!(results.len(), 1);
        let first = &results[0].matches[0];
        assert_eq!(first.position, text.find("RUNNING").unwrap());
        assert_eq!(first.matched_text, "RUNNING");
        assert_eq!(first.context, text);
    }

    #[test]
    fn context_is_fifty_chars_each_side() {
        let text = format!("{} needle {}", "é".repeat(80), "b".repeat(80));
        let start = text.find("needle").unwrap();
        let ctx = context_around(&text, start, start + "needle".len());
        assert_eq!(ctx.chars().count(), 50 + "needle".len() + 50);
        assert!(ctx.starts_with('é'));
    }

    #[test]
    fn matches_are_ordered_by_position() {
        let record = build_analysis_record("d", "walked home, then walking back; walks daily").unwrap();
        let corpus = [record];
        let results = search(&corpus, "walking");
        let positions: Vec<usize> = results[0].matches.iter().map(|m| m.position).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        // walked, walking, walks
        assert_eq!(results[0].matches.len(), 3);
    }

    #[test]
    fn corpus_order_is_preserved() {
        let corpus = vec![
            build_analysis_record("b", "zebras graze quietly").unwrap(),
            build_analysis_record("a", "nothing relevant here").unwrap(),
            build_analysis_record("c", "a zebra wanders alone").unwrap(),
        ];
        let names: Vec<&str> = search(&corpus, "zebra*").iter().map(|r| r.record.name()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn accented_letters_end_a_word() {
        let text = "Meet me at the café tonight";
        let corpus = [build_analysis_record("d", text).unwrap()];
        let results = search(&corpus, "caf");
        assert_eq!(results.len(), 1);
        let only = &results[0].matches;
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].position, text.find("café").unwrap());
        assert_eq!(only[0].matched_text, "caf");
    }

    #[test]
    fn records_without_a_located_match_are_dropped() {
        // Cleaning splits "abc123" into "abc"; the original has no such word.
        let corpus = [build_analysis_record("d", "version abc123 shipped today").unwrap()];
        assert!(search(&corpus, "abc").is_empty());
    }

    #[test]
    fn one_word_is_reported_once() {
        let corpus = [build_analysis_record("d", "She was running home.").unwrap()];
        let results = search(&corpus, "running run*");
        let spans: Vec<(usize, &str, &str)> =
            results[0].matches.iter().map(|m| (m.position, m.matched_text.as_str(), m.term.as_str())).collect();
        assert_eq!(spans, [(8, "running", "running")]);
    }

    #[test]
    fn wildcard_stops_at_non_ascii_letters() {
        let term = QueryTerm { original: "caf*".into(), term: "caf*".into(), kind: TermKind::Wildcard };
        let re = term.regex().unwrap();
        assert_eq!(re.find("un café").map(|m| m.as_str()), Some("caf"));
    }

    #[test]
    fn summary_counts_each_term() {
        let summary = match_summary("Runs and runs, running runner", "running");
        assert_eq!(summary[0], MatchSummary { term: "running".into(), kind: TermKind::Exact, occurrences: 1 });
        assert_eq!(summary[1].occurrences, 4);
    }

    #[test]
    fn highlight_wraps_spans_once() {
        let record = build_analysis_record("d", "Cats chase cats.").unwrap();
        let corpus = [record];
        let results = search(&corpus, "cats cat*");
        let marked = highlight(corpus[0].original_content(), &results[0].matches, "[", "]");
        assert_eq!(marked, "[Cats] chase [cats].");
    }

    #[test]
    fn empty_inputs_are_total() {
        assert!(search(&[], "anything").is_empty());
        assert_eq!(highlight("", &[], "<", ">"), "");
        assert!(match_summary("", "").is_empty());
    }
}
