//! Corpus texts, word indexes and the loaded [`Bible`].
//!
//! Every verse exists in four parallel variants:
//!
//! - display: punctuated, may carry italic code points and a `¶ ` marker
//! - display, lowercased
//! - stripped: punctuation removed, `’` apostrophes and `æ` ligatures kept
//! - stripped, lowercased
//!
//! Whole-word searching goes through the word indexes; the display variants
//! are what substring and regular-expression searches scan.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bible::position::{Locus, Position, PositionModel};
use crate::constants::files;
use crate::error::{Error, Result};

/// Whether matching distinguishes upper and lower case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    /// Match case exactly.
    Sensitive,
    /// Compare lowercased text.
    #[default]
    Insensitive,
}

/// Whether an index was built from punctuated or stripped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Punctuation {
    /// Tokens taken from the display text, punctuation attached.
    Kept,
    /// Tokens taken from the stripped text.
    Stripped,
}

/// `word -> positions containing it`.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    words: HashMap<String, BTreeSet<Position>>,
}

impl WordIndex {
    /// Index every whitespace-separated token of each verse.
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        let mut words: HashMap<String, BTreeSet<Position>> = HashMap::new();
        for (i, text) in texts.iter().enumerate() {
            for token in text.as_ref().split_whitespace() {
                words.entry(token.to_string()).or_default().insert(Position::new(i));
            }
        }
        Self { words }
    }

    /// Wrap a pre-built mapping.
    pub const fn from_map(words: HashMap<String, BTreeSet<Position>>) -> Self {
        Self { words }
    }

    /// Positions containing `word`, if it is indexed.
    pub fn get(&self, word: &str) -> Option<&BTreeSet<Position>> {
        self.words.get(word)
    }

    /// Whether `word` is indexed.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// The four word indexes, by case and punctuation handling.
#[derive(Debug, Clone, Default)]
pub struct WordIndexes {
    kept: WordIndex,
    kept_lower: WordIndex,
    stripped: WordIndex,
    stripped_lower: WordIndex,
}

impl WordIndexes {
    /// Build all four indexes from the corpus texts.
    pub fn build(corpus: &Corpus) -> Self {
        let kept = |texts: &[String]| {
            let tokens: Vec<String> = texts
                .iter()
                .map(|t| t.split_whitespace().filter(|w| *w != "¶").collect::<Vec<_>>().join(" "))
                .collect();
            WordIndex::from_texts(&tokens)
        };
        let indexes = Self {
            kept: kept(&corpus.display),
            kept_lower: kept(&corpus.display_lower),
            stripped: WordIndex::from_texts(&corpus.stripped),
            stripped_lower: WordIndex::from_texts(&corpus.stripped_lower),
        };
        tracing::debug!(
            "Indexed {} stripped words ({} lowercase)",
            indexes.stripped.len(),
            indexes.stripped_lower.len()
        );
        indexes
    }

    /// Assemble indexes supplied from elsewhere.
    pub const fn from_parts(
        kept: WordIndex,
        kept_lower: WordIndex,
        stripped: WordIndex,
        stripped_lower: WordIndex,
    ) -> Self {
        Self { kept, kept_lower, stripped, stripped_lower }
    }

    /// The index for a case/punctuation combination.
    pub const fn get(&self, case: Case, punctuation: Punctuation) -> &WordIndex {
        match (case, punctuation) {
            (Case::Sensitive, Punctuation::Kept) => &self.kept,
            (Case::Insensitive, Punctuation::Kept) => &self.kept_lower,
            (Case::Sensitive, Punctuation::Stripped) => &self.stripped,
            (Case::Insensitive, Punctuation::Stripped) => &self.stripped_lower,
        }
    }
}

/// The four parallel text variants, addressed by position.
#[derive(Debug, Clone)]
pub struct Corpus {
    display: Vec<String>,
    display_lower: Vec<String>,
    stripped: Vec<String>,
    stripped_lower: Vec<String>,
}

impl Corpus {
    /// Build from display and stripped text; the lowercase variants are derived.
    pub fn new(display: Vec<String>, stripped: Vec<String>) -> Result<Self> {
        if display.len() != stripped.len() {
            return Err(Error::corpus(format!(
                "{} display verses but {} stripped verses",
                display.len(),
                stripped.len()
            )));
        }
        let display_lower = display.iter().map(|t| t.to_lowercase()).collect();
        let stripped_lower = stripped.iter().map(|t| t.to_lowercase()).collect();
        Ok(Self { display, display_lower, stripped, stripped_lower })
    }

    /// Number of verses.
    pub fn len(&self) -> usize {
        self.display.len()
    }

    /// Whether the corpus has no verses.
    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    /// Display text, lowercased for case-insensitive use. Empty when out of range.
    pub fn display(&self, position: Position, case: Case) -> &str {
        let texts = match case {
            Case::Sensitive => &self.display,
            Case::Insensitive => &self.display_lower,
        };
        texts.get(position.index()).map_or("", String::as_str)
    }

    /// Stripped text, lowercased for case-insensitive use. Empty when out of range.
    pub fn stripped(&self, position: Position, case: Case) -> &str {
        let texts = match case {
            Case::Sensitive => &self.stripped,
            Case::Insensitive => &self.stripped_lower,
        };
        texts.get(position.index()).map_or("", String::as_str)
    }
}

/// Everything searching and navigation read: positions, texts and indexes.
///
/// Built once, then shared by reference.
#[derive(Debug, Clone)]
pub struct Bible {
    /// Position ↔ locus mapping.
    pub model: PositionModel,
    /// Verse texts.
    pub corpus: Corpus,
    /// Word indexes over the texts.
    pub words: WordIndexes,
}

impl Bible {
    /// Combine a model and texts, building the word indexes.
    pub fn new(model: PositionModel, corpus: Corpus) -> Result<Self> {
        let words = WordIndexes::build(&corpus);
        Self::with_indexes(model, corpus, words)
    }

    /// Combine a model, texts and pre-built indexes.
    pub fn with_indexes(model: PositionModel, corpus: Corpus, words: WordIndexes) -> Result<Self> {
        if corpus.len() != model.len() {
            return Err(Error::corpus(format!(
                "{} verses of text for {} positions",
                corpus.len(),
                model.len()
            )));
        }
        Ok(Self { model, corpus, words })
    }

    /// Load `info.json`, `display.txt` and `stripped.txt` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let info_path = dir.join(files::INFO);
        let info: Vec<[usize; 3]> = serde_json::from_str(&read(&info_path)?)
            .map_err(|e| Error::parse(format!("Invalid position table: {e}"), info_path.clone()))?;
        let model = PositionModel::new(info.into_iter().map(Locus::from).collect())?;

        let display = read_lines(&dir.join(files::DISPLAY))?;
        let stripped = read_lines(&dir.join(files::STRIPPED))?;
        let bible = Self::new(model, Corpus::new(display, stripped)?)?;

        tracing::info!("Loaded {} verses from {}", bible.model.len(), dir.display());
        Ok(bible)
    }
}

fn read(path: &Path) -> Result<String> {
    fs_err::read_to_string(path).map_err(|source| Error::Io {
        source,
        path: Some(PathBuf::from(path)),
    })
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(read(path)?.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::test_support::fixture_bible;

    #[test]
    fn test_indexes_by_case_and_punctuation() {
        let bible = fixture_bible();
        let first = Position::new(0);

        let stripped = bible.words.get(Case::Sensitive, Punctuation::Stripped);
        assert!(stripped.get("LORD").is_some());
        assert!(stripped.get("earth").unwrap().contains(&first));
        assert!(stripped.get("earth.").is_none());

        let kept = bible.words.get(Case::Sensitive, Punctuation::Kept);
        assert!(kept.get("earth.").unwrap().contains(&first));
        assert!(!kept.contains("¶"));

        let lower = bible.words.get(Case::Insensitive, Punctuation::Stripped);
        assert!(lower.contains("lord"));
        assert!(!lower.contains("LORD"));
    }

    #[test]
    fn test_corpus_variants() {
        let bible = fixture_bible();
        let p = Position::new(0);
        assert!(bible.corpus.display(p, Case::Sensitive).starts_with("In the beginning"));
        assert!(bible.corpus.display(p, Case::Insensitive).starts_with("in the beginning"));
        assert!(!bible.corpus.stripped(p, Case::Sensitive).contains('.'));
        assert_eq!(bible.corpus.display(Position::new(10_000), Case::Sensitive), "");
    }

    #[test]
    fn test_mismatched_lengths_are_rejected() {
        assert!(Corpus::new(vec!["a".into()], Vec::new()).is_err());
        let model = PositionModel::from_chapter_lengths(&[vec![2]]).unwrap();
        let corpus = Corpus::new(vec!["a".into()], vec!["a".into()]).unwrap();
        assert!(Bible::new(model, corpus).is_err());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(files::INFO), "[[0,0,0],[0,0,1],[0,1,0],[1,0,0]]").unwrap();
        std::fs::write(dir.path().join(files::DISPLAY), "In the beginning.\nAnd God said,\n¶ Thus.\nNow.\n")
            .unwrap();
        std::fs::write(dir.path().join(files::STRIPPED), "In the beginning\nAnd God said\nThus\nNow\n").unwrap();

        let bible = Bible::load(dir.path()).unwrap();
        assert_eq!(bible.model.len(), 4);
        assert_eq!(bible.model.chapter_count(0), 2);
        assert!(bible.words.get(Case::Sensitive, Punctuation::Stripped).contains("God"));
    }

    #[test]
    fn test_load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = Bible::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(_), .. }));

        std::fs::write(dir.path().join(files::INFO), "not json").unwrap();
        let err = Bible::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
