//! Linguistic profiling and search for plain-text documents.
//!
//! Raw text is screened, cleaned, counted, classified by language, and
//! tokenized into an [`AnalysisRecord`]. A corpus of records can then be
//! searched with exact, stemmed, and wildcard terms whose match offsets refer
//! to each document's original content. The [`edit`] module holds the
//! word and character tools that work on arbitrary text.
//!
//! Everything here is synchronous and free of I/O.

pub mod document;
pub mod edit;
pub mod error;
pub mod frequency;
pub mod language;
pub mod navigation;
pub mod normalizer;
pub mod search;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use document::{build_analysis_record, AnalysisRecord, Analyzer};
pub use error::InvalidInputError;
pub use frequency::ForeignChar;
pub use language::Language;
pub use navigation::{advance, Cursor, Direction, MatchNavigator};
pub use normalizer::{classify_input, clean, decode_bytes, Classification, Rejection};
pub use search::{search, Query, QueryTerm, SearchMatch, SearchResult, TermKind};
pub use stemmer::stem;
pub use stopwords::StopWordSets;
