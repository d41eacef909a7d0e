//! Letter, character, and word frequency tables.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use unicode_normalization::UnicodeNormalization;

/// Percentage of each ASCII letter among all ASCII letters of `text`,
/// case-insensitive, rounded to two decimals. All 26 letters are present;
/// every entry is zero when the text has no ASCII letter.
pub fn letter_frequency(text: &str) -> BTreeMap<char, f64> {
    let mut counts = [0usize; 26];
    let mut total = 0usize;
    for c in text.chars().filter(char::is_ascii_alphabetic) {
        counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1;
        total += 1;
    }
    (b'a'..=b'z')
        .zip(counts)
        .map(|(letter, count)| {
            let pct = if total > 0 { round2(count as f64 / total as f64 * 100.0) } else { 0.0 };
            (letter as char, pct)
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raw letter counts over cleaned text. Only letters that occur are listed.
pub fn char_frequency(cleaned: &str) -> BTreeMap<char, usize> {
    let mut freq = BTreeMap::new();
    for c in cleaned.chars().filter(char::is_ascii_lowercase) {
        *freq.entry(c).or_insert(0) += 1;
    }
    freq
}

pub fn word_frequency<S: AsRef<str>>(words: &[S]) -> BTreeMap<String, usize> {
    let mut freq = BTreeMap::new();
    for word in words {
        *freq.entry(word.as_ref().to_string()).or_insert(0) += 1;
    }
    freq
}

/// Words by count descending, ties alphabetical, at most `n` of them.
pub fn top_words(freq: &BTreeMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut sorted: Vec<(String, usize)> = freq.iter().map(|(w, c)| (w.clone(), *c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}

pub fn average_word_length<S: AsRef<str>>(words: &[S]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let total: usize = words.iter().map(|w| w.as_ref().chars().count()).sum();
    total as f64 / words.len() as f64
}

/// An accented Latin-1 letter found in the original content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignChar {
    pub character: char,
    pub count: usize,
    pub description: String,
}

fn is_accented(c: char) -> bool {
    ('\u{c0}'..='\u{ff}').contains(&c) && c != '×' && c != '÷'
}

/// Accented letters of `text` (after NFC composition), most frequent first.
pub fn foreign_chars(text: &str) -> Vec<ForeignChar> {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in text.nfc().filter(|c| is_accented(*c)) {
        *counts.entry(c).or_insert(0) += 1;
    }
    let mut found: Vec<ForeignChar> = counts
        .into_iter()
        .map(|(character, count)| ForeignChar { character, count, description: describe_char(character) })
        .collect();
    found.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.character.cmp(&b.character)));
    found
}

pub fn describe_char(c: char) -> String {
    let lower = c.to_lowercase().next().unwrap_or(c);
    let known = match lower {
        'à' => "a with grave accent",
        'á' => "a with acute accent",
        'â' => "a with circumflex",
        'ã' => "a with tilde",
        'ä' => "a with diaeresis",
        'å' => "a with ring above",
        'è' => "e with grave accent",
        'é' => "e with acute accent",
        'ê' => "e with circumflex",
        'ë' => "e with diaeresis",
        'ì' => "i with grave accent",
        'í' => "i with acute accent",
        'î' => "i with circumflex",
        'ï' => "i with diaeresis",
        'ò' => "o with grave accent",
        'ó' => "o with acute accent",
        'ô' => "o with circumflex",
        'õ' => "o with tilde",
        'ö' => "o with diaeresis",
        'ù' => "u with grave accent",
        'ú' => "u with acute accent",
        'û' => "u with circumflex",
        'ü' => "u with diaeresis",
        'ç' => "c with cedilla",
        'ñ' => "n with tilde",
        _ => return format!("accented character ({c})"),
    };
    known.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_percentages_sum_to_a_hundred() {
        let freq = letter_frequency("The quick brown fox jumps over the lazy dog, 1234!");
        assert_eq!(freq.len(), 26);
        let sum: f64 = freq.values().sum();
        assert!((sum - 100.0).abs() < 0.2, "sum was {sum}");
    }

    #[test]
    fn letter_frequency_counts_original_case_insensitively() {
        let freq = letter_frequency("AaB é");
        assert_eq!(freq[&'a'], 66.67);
        assert_eq!(freq[&'b'], 33.33);
        assert_eq!(freq[&'e'], 0.0);
    }

    #[test]
    fn no_letters_means_all_zero() {
        let freq = letter_frequency("123 ¿¡ ñ");
        assert_eq!(freq.len(), 26);
        assert!(freq.values().all(|p| *p == 0.0));
    }

    #[test]
    fn char_and_word_counts() {
        let chars = char_frequency("abba cab");
        assert_eq!(chars[&'a'], 3);
        assert_eq!(chars[&'b'], 3);
        assert_eq!(chars.get(&'z'), None);

        let words = word_frequency(&["cat", "mat", "cat"]);
        assert_eq!(words["cat"], 2);
        assert_eq!(top_words(&words, 1), vec![("cat".to_string(), 2)]);
    }

    #[test]
    fn top_words_breaks_ties_alphabetically() {
        let words = word_frequency(&["pear", "apple", "pear", "apple", "fig"]);
        let top: Vec<_> = top_words(&words, 5).into_iter().map(|(w, _)| w).collect();
        assert_eq!(top, ["apple", "pear", "fig"]);
    }

    #[test]
    fn average_length() {
        assert_eq!(average_word_length::<&str>(&[]), 0.0);
        assert_eq!(average_word_length(&["ab", "abcd"]), 3.0);
    }

    #[test]
    fn foreign_chars_sorted_and_described() {
        let found = foreign_chars("ñandú ñu ña × ÷");
        assert_eq!(found[0].character, 'ñ');
        assert_eq!(found[0].count, 3);
        assert_eq!(found[0].description, "n with tilde");
        assert_eq!(found[1].character, 'ú');
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn decomposed_accents_are_composed_first() {
        let found = foreign_chars("cafe\u{301}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].character, 'é');
        assert_eq!(describe_char('Ø'), "accented character (Ø)");
    }
}
