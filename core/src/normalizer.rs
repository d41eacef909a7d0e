//! Text cleaning, and the garbage-file screen that runs before it.
//!
//! [`clean`] projects raw text onto lowercase ASCII words separated by single
//! spaces. [`screen`] decides whether raw text is worth analysing at all; it
//! looks at the original content, never at the cleaned projection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Markers that identify a PDF stream pasted or renamed as text.
const PDF_SIGNATURES: [&str; 2] = ["%PDF", "%%EOF"];

/// Headers of common binary formats, as code points (one per byte).
const BINARY_SIGNATURES: [&str; 7] = [
    "PK\u{3}\u{4}",          // zip
    "\u{89}PNG",             // png
    "\u{ff}\u{d8}\u{ff}",    // jpeg
    "GIF8",                  // gif
    "\u{0}\u{0}\u{1}\u{0}",  // ico
    "RIFF",                  // wav
    "\u{1f}\u{8b}\u{8}",     // gzip
];

const NULL_BYTE_LIMIT: f64 = 0.01;
const NON_PRINTABLE_LIMIT: f64 = 0.05;
const WORD_SAMPLE: usize = 100;
const MIN_VALID_WORD_RATIO: f64 = 0.3;
const MIN_LETTER_SHARE: f64 = 0.7;

/// Why a piece of input was refused. Each variant carries a distinct,
/// user-facing reason (see [`Rejection::reason`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    PdfDocument,
    BinarySignature,
    Empty,
    NullBytes,
    NonPrintable,
    NoWords,
    TooFewWords,
}

impl Rejection {
    pub fn reason(self) -> &'static str {
        match self {
            Rejection::PdfDocument => {
                "This appears to be a PDF file. PDF files cannot be directly converted to .txt format. \
                 Please use a proper PDF-to-text converter or save the content as plain text."
            }
            Rejection::BinarySignature => {
                "This appears to be a binary file (image, archive, etc.) disguised as text. \
                 Binary files cannot be processed as text documents."
            }
            Rejection::Empty => "The file appears to be empty.",
            Rejection::NullBytes => {
                "This file contains null bytes and appears to be binary data. \
                 Please ensure you are uploading a plain text (.txt) file."
            }
            Rejection::NonPrintable => {
                "This file contains excessive non-printable characters and may be corrupted \
                 or in an unsupported format."
            }
            Rejection::NoWords => "The file does not contain recognizable words or text.",
            Rejection::TooFewWords => {
                "The file does not contain enough recognizable words. It may be corrupted, \
                 encoded incorrectly, or not a text document."
            }
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Outcome of [`classify_input`] in the flat shape collaborators consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub accept: bool,
    pub reason: String,
}

/// Run the garbage screen and flatten the verdict. `reason` is empty on accept.
pub fn classify_input(text: &str) -> Classification {
    match screen(text) {
        Ok(()) => Classification { accept: true, reason: String::new() },
        Err(rejection) => Classification { accept: false, reason: rejection.reason().to_string() },
    }
}

/// The garbage screen. Rules run in a fixed order and the first one that fires
/// wins; signature checks come before any density check.
pub fn screen(text: &str) -> Result<(), Rejection> {
    if PDF_SIGNATURES.iter().any(|sig| text.contains(sig)) {
        return Err(Rejection::PdfDocument);
    }
    if BINARY_SIGNATURES.iter().any(|sig| text.contains(sig)) {
        return Err(Rejection::BinarySignature);
    }

    let total = text.chars().count();
    if total == 0 {
        return Err(Rejection::Empty);
    }

    let mut nulls = 0usize;
    let mut non_printable = 0usize;
    for c in text.chars() {
        if c == '\0' {
            nulls += 1;
        }
        if is_non_printable(c) {
            non_printable += 1;
        }
    }
    if nulls as f64 > total as f64 * NULL_BYTE_LIMIT {
        return Err(Rejection::NullBytes);
    }
    if non_printable as f64 > total as f64 * NON_PRINTABLE_LIMIT {
        return Err(Rejection::NonPrintable);
    }

    let mut tokens = text.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return Err(Rejection::NoWords);
    }
    let mut sampled = 0usize;
    let mut valid = 0usize;
    for token in tokens.take(WORD_SAMPLE) {
        sampled += 1;
        if is_plausible_word(token) {
            valid += 1;
        }
    }
    if (valid as f64) < sampled as f64 * MIN_VALID_WORD_RATIO {
        return Err(Rejection::TooFewWords);
    }
    Ok(())
}

/// Control characters other than tab, newline, and carriage return.
fn is_non_printable(c: char) -> bool {
    (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r')
}

fn is_word_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{c0}'..='\u{ff}').contains(&c)
}

fn is_plausible_word(token: &str) -> bool {
    let len = token.chars().count();
    let letters = token.chars().filter(|c| is_word_letter(*c)).count();
    letters as f64 > len as f64 * MIN_LETTER_SHARE && (2..50).contains(&len)
}

/// Project text onto lowercase ASCII letters.
///
/// Non-ASCII characters are dropped outright (so `café` becomes `caf`); every
/// other non-letter, digits included, becomes a separator. Runs of separators
/// collapse to one space and the result carries no leading or trailing space.
pub fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if !c.is_ascii() {
            continue;
        }
        if c.is_ascii_alphabetic() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

/// Decode file bytes for analysis: UTF-8 when valid, otherwise Latin-1 with one
/// char per byte, which keeps binary signatures visible to [`screen`].
pub fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
