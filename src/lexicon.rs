//! `lexicon`: the word store queries run against.
//!
//! Queries only need two things from a lexicon: a membership test (for
//! crosswords) and a way to walk every word. That is the [`Lexicon`] trait,
//! implemented here for plain `HashSet`/`BTreeSet` collections and for
//! [`WordList`], the crate's own store.
//!
//! A `WordList` can be read from three formats:
//! - plain text, one word per line (`WordList::parse_text`)
//! - a raw dictionary dump with header lines and definitions
//!   (`WordList::parse_dictionary`), which is what `tilescan prepare` converts
//! - JSON with a version, free-form metadata and a checksum of the words
//!   (`WordList::parse_json`)
//!
//! Words are always uppercase `A`-`Z`. The list is kept deduplicated and
//! sorted, so iteration order is stable between runs.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fs::OpenOptions;
use std::hash::{BuildHasher, Hash};
use std::io::{self, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Version written to and expected in JSON word lists.
pub const WORDLIST_VERSION: u32 = 1;

/// Read access to a set of words.
pub trait Lexicon {
    /// Is `word` (uppercase) in the lexicon?
    fn contains(&self, word: &str) -> bool;

    /// Every word, each exactly once.
    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

impl<S, H> Lexicon for HashSet<S, H>
where
    S: Borrow<str> + Eq + Hash,
    H: BuildHasher,
{
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word)
    }

    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(<S as Borrow<str>>::borrow))
    }
}

impl<S> Lexicon for BTreeSet<S>
where
    S: Borrow<str> + Ord,
{
    fn contains(&self, word: &str) -> bool {
        BTreeSet::contains(self, word)
    }

    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(<S as Borrow<str>>::borrow))
    }
}

/// Errors raised while loading or saving a word list.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("failed to access word list '{path}': {source}")]
    Io { path: String, source: io::Error },

    #[error("invalid word \"{word}\" on line {line}")]
    InvalidWord { line: usize, word: String },

    #[error("word list version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("word list checksum mismatch: recorded {recorded}, computed {computed}")]
    ChecksumMismatch { recorded: String, computed: String },

    #[error("malformed word list JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("refusing to overwrite existing file '{path}'")]
    AlreadyExists { path: String },
}

impl LexiconError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            LexiconError::Io { .. } => "L001",
            LexiconError::InvalidWord { .. } => "L002",
            LexiconError::VersionMismatch { .. } => "L003",
            LexiconError::ChecksumMismatch { .. } => "L004",
            LexiconError::Json(_) => "L005",
            LexiconError::AlreadyExists { .. } => "L006",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            LexiconError::Io { .. } => "Word list file could not be read or written",
            LexiconError::InvalidWord { .. } => "Word contains characters outside A-Z",
            LexiconError::VersionMismatch { .. } => "JSON word list has an unsupported version",
            LexiconError::ChecksumMismatch { .. } => "JSON word list does not match its checksum",
            LexiconError::Json(_) => "JSON word list is malformed",
            LexiconError::AlreadyExists { .. } => "Output file already exists",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            LexiconError::Io { .. } => "The operating system reported an error while opening, reading or writing the word list file.",
            LexiconError::InvalidWord { .. } => "Every word must consist of the letters A-Z only. Text lists are uppercased before the check; dictionary dumps must already be uppercase.",
            LexiconError::VersionMismatch { .. } => "JSON word lists carry a format version. Only version 1 is understood.",
            LexiconError::ChecksumMismatch { .. } => "JSON word lists record the SHA-1 hex digest of their sorted words, concatenated. The recorded digest differs from the one computed on load, so the list was edited or corrupted.",
            LexiconError::Json(_) => "The file is not valid JSON, or lacks one of the fields version, description, date, checksum, words.",
            LexiconError::AlreadyExists { .. } => "Word lists are never written over an existing file.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            LexiconError::InvalidWord { .. } => Some("Remove or fix the offending line, or use --skip to drop header lines"),
            LexiconError::ChecksumMismatch { .. } => Some("Regenerate the JSON file with 'tilescan prepare'"),
            LexiconError::AlreadyExists { .. } => Some("Choose another output path or delete the existing file first"),
            _ => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// How much to trust a plain-text word list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Uppercase every word and reject anything outside A-Z.
    #[default]
    Safe,
    /// Trim lines only; the file is assumed to be clean already.
    Fast,
}

/// Metadata stored alongside the words in the JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordListMeta {
    pub description: String,
    pub date: String,
    /// SHA-1 hex digest of the sorted words, concatenated.
    pub checksum: String,
}

#[derive(Serialize)]
struct WordListJsonOut<'a> {
    version: u32,
    description: &'a str,
    date: &'a str,
    checksum: &'a str,
    words: &'a [String],
}

#[derive(Deserialize)]
struct WordListJsonIn {
    version: u32,
    description: String,
    date: String,
    checksum: String,
    words: Vec<String>,
}

/// Digest of `words`, which must already be sorted.
fn checksum_sorted(words: &[String]) -> String {
    let mut hasher = Sha1::new();
    for word in words {
        hasher.update(word.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Checksum of a set of words, in any order.
#[must_use]
pub fn calc_checksum<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut words: Vec<String> = words.into_iter().map(Into::into).collect();
    words.sort();
    words.dedup();
    checksum_sorted(&words)
}

fn is_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_uppercase())
}

/// A sorted, deduplicated list of uppercase words with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordList {
    meta: WordListMeta,
    words: Vec<String>,
}

impl WordList {
    /// Build a list from `words`, computing the checksum.
    pub fn new<I, S>(description: &str, date: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: Vec<String> = words.into_iter().map(Into::into).collect();

        // dedup only removes adjacent duplicates, so sort first
        words.sort();
        words.dedup();

        let meta = WordListMeta {
            description: description.to_string(),
            date: date.to_string(),
            checksum: checksum_sorted(&words),
        };
        WordList { meta, words }
    }

    /// Replace the description and date. The words and checksum are kept.
    #[must_use]
    pub fn with_meta(mut self, description: &str, date: &str) -> Self {
        self.meta.description = description.to_string();
        self.meta.date = date.to_string();
        self
    }

    #[must_use]
    pub fn meta(&self) -> &WordListMeta {
        &self.meta
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in alphabetical order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.words.iter()
    }

    /// Parse a plain-text list, one word per line. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// In `LoadMode::Safe`, `LexiconError::InvalidWord` for the first word that
    /// is not made of letters.
    pub fn parse_text(contents: &str, mode: LoadMode) -> Result<Self, LexiconError> {
        let mut words = Vec::new();
        for (idx, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            match mode {
                LoadMode::Fast => words.push(line.to_string()),
                LoadMode::Safe => {
                    let word = line.to_ascii_uppercase();
                    if !is_word(&word) {
                        return Err(LexiconError::InvalidWord { line: idx + 1, word: line.to_string() });
                    }
                    words.push(word);
                }
            }
        }
        Ok(WordList::new("", "", words))
    }

    /// Parse a raw dictionary dump: the first `skip` lines are headers, and
    /// anything after the first whitespace on a line is a definition.
    ///
    /// # Errors
    ///
    /// `LexiconError::InvalidWord` for the first headword that is not uppercase
    /// A-Z.
    pub fn parse_dictionary(contents: &str, skip: usize) -> Result<Self, LexiconError> {
        let mut words = Vec::new();
        for (idx, raw_line) in contents.lines().enumerate().skip(skip) {
            let Some(word) = raw_line.split_whitespace().next() else {
                continue;
            };
            if !is_word(word) {
                return Err(LexiconError::InvalidWord { line: idx + 1, word: word.to_string() });
            }
            words.push(word);
        }
        Ok(WordList::new("", "", words))
    }

    /// Parse the JSON format, checking version and checksum.
    ///
    /// # Errors
    ///
    /// `LexiconError::Json`, `LexiconError::VersionMismatch` or
    /// `LexiconError::ChecksumMismatch`.
    pub fn parse_json(contents: &str) -> Result<Self, LexiconError> {
        let data: WordListJsonIn = serde_json::from_str(contents)?;

        if data.version != WORDLIST_VERSION {
            return Err(LexiconError::VersionMismatch { expected: WORDLIST_VERSION, found: data.version });
        }

        let list = WordList::new(&data.description, &data.date, data.words);
        if list.meta.checksum != data.checksum {
            return Err(LexiconError::ChecksumMismatch {
                recorded: data.checksum,
                computed: list.meta.checksum,
            });
        }
        Ok(list)
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// `LexiconError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, LexiconError> {
        let out = WordListJsonOut {
            version: WORDLIST_VERSION,
            description: &self.meta.description,
            date: &self.meta.date,
            checksum: &self.meta.checksum,
            words: &self.words,
        };
        Ok(serde_json::to_string_pretty(&out)?)
    }

    /// Read a list from `path`: JSON if the extension is `.json`, plain text
    /// otherwise.
    ///
    /// # Errors
    ///
    /// `LexiconError::Io` if the file cannot be read, or any parse error of
    /// the chosen format.
    pub fn load_from_path<P: AsRef<Path>>(path: P, mode: LoadMode) -> Result<Self, LexiconError> {
        let path_ref = path.as_ref();

        let data = std::fs::read_to_string(path_ref).map_err(|source| LexiconError::Io {
            path: path_ref.display().to_string(),
            source,
        })?;

        let is_json = path_ref
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let list = if is_json { Self::parse_json(&data)? } else { Self::parse_text(&data, mode)? };

        info!("Loaded {} words from {}", list.len(), path_ref.display());
        Ok(list)
    }

    /// Write the JSON format to `path`, which must not exist yet.
    ///
    /// # Errors
    ///
    /// `LexiconError::AlreadyExists` if `path` exists, `LexiconError::Io` on
    /// any other write failure.
    pub fn write_json_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), LexiconError> {
        let path_ref = path.as_ref();
        let json = self.to_json()?;

        let io_err = |source: io::Error| {
            if source.kind() == io::ErrorKind::AlreadyExists {
                LexiconError::AlreadyExists { path: path_ref.display().to_string() }
            } else {
                LexiconError::Io { path: path_ref.display().to_string(), source }
            }
        };

        let mut file = OpenOptions::new().write(true).create_new(true).open(path_ref).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        Ok(())
    }
}

impl Lexicon for WordList {
    fn contains(&self, word: &str) -> bool {
        self.words.binary_search_by(|w| w.as_str().cmp(word)).is_ok()
    }

    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.words.iter().map(String::as_str))
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &WordList) -> Vec<&str> {
        list.words().collect()
    }

    #[test]
    fn test_parse_text_normalizes_and_sorts() {
        let list = WordList::parse_text("  cat \nDog\n\nbird\ncat\n", LoadMode::Safe).unwrap();
        assert_eq!(words(&list), vec!["BIRD", "CAT", "DOG"]);
    }

    #[test]
    fn test_parse_text_rejects_non_letters() {
        let err = WordList::parse_text("cat\ndon't\n", LoadMode::Safe).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidWord { line: 2, ref word } if word == "don't"));
        assert_eq!(err.code(), "L002");
    }

    #[test]
    fn test_parse_text_fast_mode_trusts_input() {
        let list = WordList::parse_text(" CAT\nDOG \n", LoadMode::Fast).unwrap();
        assert_eq!(words(&list), vec!["CAT", "DOG"]);
    }

    #[test]
    fn test_parse_dictionary_skips_headers_and_definitions() {
        let input = "My Word List\n(c) nobody\nAA a rough lava\nAB an abdominal muscle\n\nZA pizza\n";
        let list = WordList::parse_dictionary(input, 2).unwrap();
        assert_eq!(words(&list), vec!["AA", "AB", "ZA"]);
    }

    #[test]
    fn test_parse_dictionary_requires_uppercase() {
        let err = WordList::parse_dictionary("HEADER\nAA lava\nab muscle\n", 1).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidWord { line: 3, .. }));
    }

    #[test]
    fn test_contains_and_lexicon_impls() {
        let list = WordList::new("", "", ["CAT", "CAST"]);
        assert!(Lexicon::contains(&list, "CAST"));
        assert!(!Lexicon::contains(&list, "CART"));

        let set: HashSet<String> = HashSet::from(["CAT".to_string()]);
        assert!(Lexicon::contains(&set, "CAT"));
        assert_eq!(set.words().count(), 1);

        let tree: BTreeSet<&str> = BTreeSet::from(["B", "A"]);
        assert_eq!(tree.words().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_checksum_ignores_order_and_duplicates() {
        assert_eq!(calc_checksum(["B", "A"]), calc_checksum(["A", "B", "A"]));
        assert_eq!(WordList::new("", "", ["B", "A"]).meta().checksum, calc_checksum(["A", "B"]));
    }

    #[test]
    fn test_checksum_is_sha1_of_sorted_words() {
        assert_eq!(calc_checksum(["CAT", "CAST"]), "dc5d4d6a0a6898203cdf4ed1be086a231ce89e77");
        assert_eq!(calc_checksum(Vec::<String>::new()), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_with_meta_keeps_words_and_checksum() {
        let parsed = WordList::parse_dictionary("HEADER\nCAT a pet\nCAST to throw\n", 1).unwrap();
        let checksum = parsed.meta().checksum.clone();
        let list = parsed.with_meta("pets", "2024-05-01");
        assert_eq!(words(&list), vec!["CAST", "CAT"]);
        assert_eq!(list.meta().checksum, checksum);
        assert_eq!(list.meta().description, "pets");
        assert_eq!(list.meta().date, "2024-05-01");
        assert_eq!(list, WordList::new("pets", "2024-05-01", ["CAT", "CAST"]));
    }

    #[test]
    fn test_json_round_trip_keeps_metadata() {
        let list = WordList::new("test list", "2024-01-01", ["ZA", "AA"]);
        let parsed = WordList::parse_json(&list.to_json().unwrap()).unwrap();
        assert_eq!(parsed, list);
        assert_eq!(parsed.meta().description, "test list");
    }

    #[test]
    fn test_json_rejects_tampered_words() {
        let json = WordList::new("", "", ["AA"]).to_json().unwrap().replace("\"AA\"", "\"AB\"");
        let err = WordList::parse_json(&json).unwrap_err();
        assert!(matches!(err, LexiconError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_json_rejects_unknown_version() {
        let json = r#"{"version": 2, "description": "", "date": "", "checksum": "", "words": []}"#;
        let err = WordList::parse_json(json).unwrap_err();
        assert!(matches!(err, LexiconError::VersionMismatch { expected: 1, found: 2 }));
    }

    #[test]
    fn test_json_rejects_missing_fields() {
        let err = WordList::parse_json(r#"{"version": 1}"#).unwrap_err();
        assert_eq!(err.code(), "L005");
    }

    #[test]
    fn test_files_round_trip_and_refuse_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("words.txt");
        std::fs::write(&text_path, "cat\ncast\n").unwrap();

        let list = WordList::load_from_path(&text_path, LoadMode::Safe).unwrap();
        let json_path = dir.path().join("words.json");
        list.write_json_to_path(&json_path).unwrap();

        let loaded = WordList::load_from_path(&json_path, LoadMode::Safe).unwrap();
        assert_eq!(loaded, list);

        let err = list.write_json_to_path(&json_path).unwrap_err();
        assert!(matches!(err, LexiconError::AlreadyExists { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = WordList::load_from_path("/nonexistent/words.txt", LoadMode::Safe).unwrap_err();
        assert_eq!(err.code(), "L001");
        assert!(err.to_string().contains("/nonexistent/words.txt"));
    }
}
