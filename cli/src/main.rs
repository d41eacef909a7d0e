use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use textlens_core::edit;
use textlens_core::search::{context_bounds, highlight, match_summary, MatchSummary};
use textlens_core::stemmer::{stem_words, StemmedIndex};
use textlens_core::{
    classify_input, decode_bytes, AnalysisRecord, Analyzer, Classification, Cursor, InvalidInputError,
    MatchNavigator, Query, SearchMatch, StopWordSets,
};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "textlens")]
#[command(about = "Profile and search plain-text documents", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether each file would be accepted for analysis
    Check {
        /// Input path (file or directory)
        path: PathBuf,
    },
    /// Analyse each file and print its linguistic profile
    Analyze {
        /// Input path (file or directory)
        path: PathBuf,
        /// Number of most frequent words to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Search every file under a path
    Search {
        /// Query; plain words also match their stem, `*` is a wildcard
        #[arg(long, short)]
        query: String,
        /// Input path (file or directory)
        path: PathBuf,
        /// Step forward through each result's matches this many times
        #[arg(long, default_value_t = 0)]
        next: usize,
        /// Then step backward this many times
        #[arg(long, default_value_t = 0)]
        previous: usize,
        /// Mark matches inside the printed contexts
        #[arg(long, default_value_t = false)]
        highlight: bool,
    },
    /// Show the stem of each word, or group the words of a file by stem
    Stem {
        words: Vec<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Replace a whole word (case-insensitive) and print the new text
    ReplaceWord {
        #[arg(long)]
        word: String,
        #[arg(long = "with")]
        replacement: String,
        file: PathBuf,
    },
    /// Count whole-word occurrences of a word
    CountWord {
        #[arg(long)]
        word: String,
        file: PathBuf,
    },
    /// Up to ten words starting with a prefix, most frequent first
    Suggest {
        #[arg(long)]
        prefix: String,
        file: PathBuf,
    },
    /// Count each character of a set, or replace them all
    Chars {
        #[arg(long)]
        set: String,
        /// Replace every char of the set with this string instead of counting
        #[arg(long = "replace-with")]
        replacement: Option<String>,
        file: PathBuf,
    },
    /// Remove a comma-separated list of up to ten stop words
    StripWords {
        #[arg(long)]
        words: String,
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let stop_words = StopWordSets::default();
    let analyzer = Analyzer::new(&stop_words);

    match cli.command {
        Commands::Check { path } => check(&path, cli.format),
        Commands::Analyze { path, top } => analyze(&analyzer, &path, top, cli.format),
        Commands::Search { query, path, next, previous, highlight } => {
            let opts = SearchOpts { next, previous, highlight };
            search(&analyzer, &query, &path, &opts, cli.format)
        }
        Commands::Stem { words, file } => stem(&words, file.as_deref(), cli.format),
        Commands::ReplaceWord { word, replacement, file } => {
            let out = edit::replace_word(&read_text(&file)?, &word, &replacement);
            if cli.format == Format::Json {
                return print_json(&out);
            }
            eprintln!("replaced {} occurrence(s) of {word:?} with {replacement:?}", out.count);
            println!("{}", out.text);
            Ok(())
        }
        Commands::CountWord { word, file } => {
            let count = edit::count_word(&read_text(&file)?, &word);
            if cli.format == Format::Json {
                return print_json(&serde_json::json!({ "word": word, "count": count }));
            }
            println!("{word} {count}");
            Ok(())
        }
        Commands::Suggest { prefix, file } => {
            let words = edit::suggest_words(&read_text(&file)?, &prefix);
            print_counts(&words, cli.format)
        }
        Commands::Chars { set, replacement, file } => chars(&read_text(&file)?, &set, replacement.as_deref(), cli.format),
        Commands::StripWords { words, file } => {
            let stop_words = edit::parse_stop_words(&words);
            if stop_words.is_empty() {
                anyhow::bail!("no stop words given");
            }
            let out = edit::remove_stop_words(&read_text(&file)?, &stop_words);
            if cli.format == Format::Json {
                return print_json(&out);
            }
            eprintln!(
                "removed {} of {} words ({:.2}%), {} left",
                out.total_removed, out.original_count, out.percentage_removed, out.final_count
            );
            print_counts(&out.removed, Format::Text)?;
            println!("{}", out.text);
            Ok(())
        }
    }
}

fn print_counts(counts: &[(String, usize)], format: Format) -> Result<()> {
    if format == Format::Json {
        return print_json(&counts);
    }
    for (word, n) in counts {
        println!("{word} {n}");
    }
    Ok(())
}

fn chars(text: &str, set: &str, replacement: Option<&str>, format: Format) -> Result<()> {
    if let Some(replacement) = replacement {
        let replaced = edit::replace_characters(text, set, replacement);
        if format == Format::Json {
            return print_json(&serde_json::json!({ "text": replaced }));
        }
        println!("{replaced}");
        return Ok(());
    }
    let counts = edit::count_characters(text, set);
    if format == Format::Json {
        return print_json(&counts);
    }
    for c in &counts {
        let shown = if c.character == ' ' { "(space)".to_string() } else { c.character.to_string() };
        println!("{shown} {} {:.2}%", c.count, c.percentage);
    }
    Ok(())
}

/// Every `*.txt` file under `input`, sorted; a file path is taken as is.
fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("no such file or directory: {}", input.display());
    }
    Ok(files)
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(decode_bytes(&bytes))
}

fn display_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string())
}

/// Analyse every file, reporting rejected ones and carrying on.
fn load_corpus(analyzer: &Analyzer<'_>, input: &Path) -> Result<Vec<AnalysisRecord>> {
    let mut corpus = Vec::new();
    for file in collect_files(input)? {
        let text = read_text(&file)?;
        match analyzer.analyze(&display_name(&file), &text) {
            Ok(record) => corpus.push(record),
            Err(err) => report_rejection(&file, &err),
        }
    }
    tracing::info!(documents = corpus.len(), "corpus loaded");
    Ok(corpus)
}

fn report_rejection(file: &Path, err: &InvalidInputError) {
    warn!(file = %file.display(), rejection = ?err.rejection, "input rejected");
    eprintln!("skipped {}: {}", file.display(), err.reason());
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct CheckReport {
    file: String,
    #[serde(flatten)]
    classification: Classification,
}

fn check(input: &Path, format: Format) -> Result<()> {
    let mut reports = Vec::new();
    for file in collect_files(input)? {
        let text = read_text(&file)?;
        reports.push(CheckReport { file: file.display().to_string(), classification: classify_input(&text) });
    }
    match format {
        Format::Json => print_json(&reports)?,
        Format::Text => {
            for r in &reports {
                if r.classification.accept {
                    println!("ok {}", r.file);
                } else {
                    println!("rejected {}: {}", r.file, r.classification.reason);
                }
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Profile<'a> {
    id: &'a str,
    name: &'a str,
    created_at: &'a str,
    language: String,
    word_count: usize,
    average_word_length: f64,
    top_words: Vec<(String, usize)>,
    foreign_chars: &'a [textlens_core::ForeignChar],
    letter_frequency: &'a std::collections::BTreeMap<char, f64>,
}

impl<'a> Profile<'a> {
    fn of(record: &'a AnalysisRecord, top: usize) -> Self {
        Self {
            id: record.id(),
            name: record.name(),
            created_at: record.created_at(),
            language: record.language().to_string(),
            word_count: record.word_count(),
            average_word_length: record.average_word_length(),
            top_words: record.top_words(top),
            foreign_chars: record.foreign_chars(),
            letter_frequency: record.letter_frequency(),
        }
    }
}

fn analyze(analyzer: &Analyzer<'_>, input: &Path, top: usize, format: Format) -> Result<()> {
    let corpus = load_corpus(analyzer, input)?;
    let profiles: Vec<Profile> = corpus.iter().map(|r| Profile::of(r, top)).collect();
    if format == Format::Json {
        return print_json(&profiles);
    }
    for p in &profiles {
        println!("{} ({})", p.name, p.id);
        println!("  language: {}", p.language);
        println!("  words: {} (average length {:.2})", p.word_count, p.average_word_length);
        if !p.top_words.is_empty() {
            let listed: Vec<String> = p.top_words.iter().map(|(w, n)| format!("{w} {n}")).collect();
            println!("  top words: {}", listed.join(", "));
        }
        for fc in p.foreign_chars {
            println!("  foreign: {} x{} ({})", fc.character, fc.count, fc.description);
        }
    }
    Ok(())
}

struct SearchOpts {
    next: usize,
    previous: usize,
    highlight: bool,
}

#[derive(Serialize)]
struct Hit<'a> {
    id: &'a str,
    name: &'a str,
    label: String,
    active: Option<usize>,
    summary: Vec<MatchSummary>,
    matches: &'a [SearchMatch],
    #[serde(skip)]
    original: &'a str,
}

/// Apply the requested steps and return the resulting cursor.
fn navigate(matches: &[SearchMatch], opts: &SearchOpts) -> (Cursor, String) {
    let mut nav = MatchNavigator::new(matches);
    for _ in 0..opts.next {
        nav.next();
    }
    for _ in 0..opts.previous {
        nav.previous();
    }
    (nav.cursor(), nav.label())
}

fn search(analyzer: &Analyzer<'_>, raw: &str, input: &Path, opts: &SearchOpts, format: Format) -> Result<()> {
    let query = Query::parse(raw);
    if query.is_empty() {
        warn!(query = raw, "query has no searchable terms");
    }
    let corpus = load_corpus(analyzer, input)?;
    let results = query.run(&corpus);

    let hits: Vec<Hit> = results
        .iter()
        .map(|res| {
            let (cursor, label) = navigate(&res.matches, opts);
            Hit {
                id: res.record.id(),
                name: res.record.name(),
                label,
                active: cursor.index(),
                summary: match_summary(res.record.original_content(), raw),
                matches: &res.matches,
                original: res.record.original_content(),
            }
        })
        .collect();

    if format == Format::Json {
        return print_json(&serde_json::json!({ "query": raw, "total_hits": hits.len(), "results": hits }));
    }
    if hits.is_empty() {
        println!("no documents match {raw:?}");
        return Ok(());
    }
    for hit in &hits {
        println!("{} [{}]", hit.name, hit.label);
        for (i, m) in hit.matches.iter().enumerate() {
            let marker = if hit.active == Some(i) { '>' } else { ' ' };
            let context = if opts.highlight { mark_context(hit.original, m) } else { m.context.clone() };
            println!("{marker} {:>6}  {}  {}", m.position, m.term, context.replace('\n', " "));
        }
    }
    Ok(())
}

/// The match's context window with the match itself bracketed.
fn mark_context(original: &str, m: &SearchMatch) -> String {
    let (from, to) = context_bounds(original, m.position, m.end());
    let local = SearchMatch { position: m.position - from, ..m.clone() };
    highlight(&original[from..to], std::slice::from_ref(&local), "[", "]")
}

fn stem(words: &[String], file: Option<&Path>, format: Format) -> Result<()> {
    if let Some(path) = file {
        let index = StemmedIndex::from_text(&read_text(path)?);
        if format == Format::Json {
            return print_json(&index);
        }
        for (root, originals) in &index.mapping {
            let forms: Vec<&str> = originals.iter().map(String::as_str).collect();
            println!("{root} {} <- {}", index.stemmed.get(root).copied().unwrap_or(0), forms.join(", "));
        }
        return Ok(());
    }

    let stems = stem_words(words);
    match format {
        Format::Json => {
            let pairs: Vec<(&String, &String)> = words.iter().zip(stems.iter()).collect();
            print_json(&pairs)?;
        }
        Format::Text => {
            for (word, root) in words.iter().zip(stems.iter()) {
                println!("{word} -> {root}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn collects_only_text_files_in_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();
        fs::write(dir.path().join("nested/c.txt"), "third").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|f| display_name(f)).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(collect_files(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn rejected_files_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.txt"), "The cat sat on the mat.").unwrap();
        fs::write(dir.path().join("scan.txt"), "%PDF-1.4 binary junk").unwrap();
        fs::write(dir.path().join("latin.txt"), b"caf\xe9 au lait avec du sucre").unwrap();

        let sets = StopWordSets::default();
        let corpus = load_corpus(&Analyzer::new(&sets), dir.path()).unwrap();
        let names: Vec<&str> = corpus.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["good.txt", "latin.txt"]);
        assert!(corpus[1].original_content().starts_with("café"));
    }

    #[test]
    fn navigation_steps_are_applied_in_order() {
        let sets = StopWordSets::default();
        let record = Analyzer::new(&sets).analyze("n", "Cat naps. The cat eats; one cat sleeps.").unwrap();
        let corpus = [record];
        let results = Query::parse("cat").run(&corpus);
        let opts = SearchOpts { next: 2, previous: 3, highlight: false };
        let (cursor, label) = navigate(&results[0].matches, &opts);
        // 0, 1, then back through 0 and the wrap to 2, ending on 1
        assert_eq!(cursor, Cursor::At(1));
        assert_eq!(label, "Match 2 of 3");
    }

    #[test]
    fn context_marks_the_reported_occurrence() {
        let original = "cat naps, cat sleeps";
        let m = SearchMatch {
            term: "cat".into(),
            position: 10,
            matched_text: "cat".into(),
            context: original.into(),
            is_wildcard: false,
        };
        assert_eq!(mark_context(original, &m), "cat naps, [cat] sleeps");
    }

    #[test]
    fn marked_context_is_windowed_around_the_match() {
        let original = format!("{}cat{}", "ab ".repeat(30), " yz".repeat(30));
        let corpus = [Analyzer::default().analyze("w", &original).unwrap()];
        let results = Query::parse("cat").run(&corpus);
        let m = &results[0].matches[0];
        let marked = mark_context(&original, m);
        assert_eq!(marked.replace(['[', ']'], ""), m.context);
        assert!(marked.contains("[cat]"));
    }
}
