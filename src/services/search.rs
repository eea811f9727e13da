//! Search engine.
//!
//! Six modes over the corpus, selected by [`SearchMode`]. Literal and
//! pattern modes scan the display text verse by verse; whole-word modes narrow
//! the candidates through the stripped word index first and then locate the
//! words in the stripped text.
//!
//! Every mode returns one [`SearchResult`] whose `occurs` and `occur` lists
//! are aligned, restricted to the request's inclusive scope, and free of
//! positions without spans.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::bible::position::{Position, Scope};
use crate::corpus::{Bible, Case, Punctuation, WordIndex};
use crate::error::{Error, SearchError};
use crate::services::key::{whole_word_pattern, NormalizedKey};

/// How a key is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Literal substring of the display text.
    #[default]
    Substring,
    /// One whole word.
    Word,
    /// Consecutive whole words.
    Phrase,
    /// Every word somewhere in the verse, ranked.
    AllWords,
    /// At least one word in the verse, ranked.
    AnyWord,
    /// Regular expression over the display text.
    Regex,
}

impl SearchMode {
    /// Name used in logs and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Word => "word",
            Self::Phrase => "phrase",
            Self::AllWords => "all_words",
            Self::AnyWord => "any_word",
            Self::Regex => "regex",
        }
    }

    /// Whether the navigator steps one verse at a time rather than one span.
    pub const fn is_ranked(self) -> bool {
        matches!(self, Self::AllWords | Self::AnyWord)
    }

    /// Whether matches are found in the stripped text.
    pub const fn is_whole_word(self) -> bool {
        matches!(self, Self::Word | Self::Phrase | Self::AllWords | Self::AnyWord)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "substring" | "raw" => Ok(Self::Substring),
            "word" => Ok(Self::Word),
            "phrase" => Ok(Self::Phrase),
            "all" | "all_words" => Ok(Self::AllWords),
            "any" | "any_word" => Ok(Self::AnyWord),
            "regex" => Ok(Self::Regex),
            other => Err(Error::config(
                format!("Unknown search mode {other:?}"),
                "Use substring, word, phrase, all_words, any_word or regex",
            )),
        }
    }
}

/// What to look for and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The key as typed.
    pub key: String,
    /// Matching mode.
    pub mode: SearchMode,
    /// Case handling.
    pub case: Case,
    /// Inclusive position range to search.
    pub scope: Scope,
}

impl SearchRequest {
    /// Build a request.
    pub fn new(key: impl Into<String>, mode: SearchMode, case: Case, scope: Scope) -> Self {
        Self { key: key.into(), mode, case, scope }
    }
}

/// A match inside one verse, in character offsets. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// First matched character.
    pub start: usize,
    /// One past the last matched character.
    pub end: usize,
}

impl Span {
    /// Matched characters.
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span matched nothing.
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Convert a byte range of `text` into character offsets.
    fn from_bytes(text: &str, start: usize, end: usize) -> Self {
        let first = text[..start].chars().count();
        Self { start: first, end: first + text[start..end].chars().count() }
    }
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The key after normalisation; for any-word searches, the words that were found.
    pub key: String,
    /// Mode searched with.
    pub mode: SearchMode,
    /// Case handling searched with.
    pub case: Case,
    /// Scope searched.
    pub scope: Scope,
    /// Matching positions, in navigation order.
    pub occurs: Vec<Position>,
    /// Spans per entry of `occurs`.
    pub occur: Vec<Vec<Span>>,
    /// Spans found, or positions for ranked modes.
    pub total: usize,
}

impl SearchResult {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.occurs.is_empty()
    }

    /// Spans for the `index`-th matching position.
    pub fn spans(&self, index: usize) -> &[Span] {
        self.occur.get(index).map_or(&[], Vec::as_slice)
    }
}

/// Positions and spans gathered by one mode.
#[derive(Default)]
struct Hits {
    occurs: Vec<Position>,
    occur: Vec<Vec<Span>>,
}

impl Hits {
    fn push(&mut self, position: Position, spans: Vec<Span>) {
        if !spans.is_empty() {
            self.occurs.push(position);
            self.occur.push(spans);
        }
    }

    fn span_count(&self) -> usize {
        self.occur.iter().map(Vec::len).sum()
    }
}

/// Run a search.
pub fn search(bible: &Bible, request: &SearchRequest) -> Result<SearchResult, SearchError> {
    tracing::debug!(
        "Searching for {:?} ({}, {:?}) in {}..={}",
        request.key,
        request.mode,
        request.case,
        request.scope.first,
        request.scope.last
    );

    let (key, hits, total) = match request.mode {
        SearchMode::Substring => {
            let key = NormalizedKey::literal(&request.key, request.case);
            if key.is_empty() {
                return Err(SearchError::EmptyKey);
            }
            let hits = substring(bible, request, &key.text);
            let total = hits.span_count();
            (key.text, hits, total)
        }
        SearchMode::Regex => {
            let key = NormalizedKey::literal(&request.key, Case::Sensitive);
            if key.is_empty() {
                return Err(SearchError::EmptyKey);
            }
            let hits = pattern(bible, request, &key.text)?;
            let total = hits.span_count();
            (key.text, hits, total)
        }
        SearchMode::Word | SearchMode::Phrase | SearchMode::AllWords | SearchMode::AnyWord => {
            let key = NormalizedKey::whole_words(&request.key, request.case);
            if key.words.is_empty() {
                return Err(SearchError::EmptyKey);
            }
            whole_words(bible, request, key)?
        }
    };

    if hits.occurs.is_empty() {
        tracing::debug!("No matches for {:?}", key);
        return Err(SearchError::NoMatches { key });
    }

    tracing::debug!("Found {} matches in {} verses", total, hits.occurs.len());
    Ok(SearchResult {
        key,
        mode: request.mode,
        case: request.case,
        scope: request.scope,
        occurs: hits.occurs,
        occur: hits.occur,
        total,
    })
}

fn substring(bible: &Bible, request: &SearchRequest, key: &str) -> Hits {
    let mut hits = Hits::default();
    for position in request.scope.positions() {
        let text = bible.corpus.display(position, request.case);
        let spans = text
            .match_indices(key)
            .map(|(at, found)| Span::from_bytes(text, at, at + found.len()))
            .collect();
        hits.push(position, spans);
    }
    hits
}

fn pattern(bible: &Bible, request: &SearchRequest, key: &str) -> Result<Hits, SearchError> {
    let regex = RegexBuilder::new(key)
        .case_insensitive(request.case == Case::Insensitive)
        .build()
        .map_err(|e| SearchError::RegexCompile { pattern: request.key.clone(), message: e.to_string() })?;

    let mut hits = Hits::default();
    for position in request.scope.positions() {
        let text = bible.corpus.display(position, Case::Sensitive);
        hits.push(position, find_spans(&regex, text));
    }
    Ok(hits)
}

fn compile(pattern: &str) -> Result<Regex, SearchError> {
    Regex::new(pattern)
        .map_err(|e| SearchError::RegexCompile { pattern: pattern.to_string(), message: e.to_string() })
}

/// Non-empty matches of `regex` in `text`.
fn find_spans(regex: &Regex, text: &str) -> Vec<Span> {
    regex
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| Span::from_bytes(text, m.start(), m.end()))
        .collect()
}

fn whole_words(
    bible: &Bible,
    request: &SearchRequest,
    key: NormalizedKey,
) -> Result<(String, Hits, usize), SearchError> {
    let index = bible.words.get(request.case, Punctuation::Stripped);
    let case = request.case;
    let text = move |position: Position| bible.corpus.stripped(position, case);
    let scope = request.scope;

    match request.mode {
        SearchMode::Word | SearchMode::Phrase if key.words.len() == 1 => {
            let Some(positions) = index.get(&key.text) else {
                return Err(SearchError::NoMatches { key: key.text });
            };
            let regex = compile(&whole_word_pattern(&key.text))?;
            let mut hits = Hits::default();
            for position in within(positions, scope) {
                hits.push(position, find_spans(&regex, text(position)));
            }
            let total = hits.span_count();
            Ok((key.text, hits, total))
        }
        SearchMode::Word | SearchMode::Phrase => {
            let candidates = intersection(&known_sets(index, &key.words)?, scope);
            let regex = compile(&whole_word_pattern(&key.text))?;
            let mut hits = Hits::default();
            for position in candidates {
                hits.push(position, find_spans(&regex, text(position)));
            }
            let total = hits.span_count();
            Ok((key.text, hits, total))
        }
        SearchMode::AllWords => {
            let candidates = intersection(&known_sets(index, &key.words)?, scope);
            let hits = every_word(&key.words, candidates, text)?;
            let total = hits.occurs.len();
            Ok((key.text, hits, total))
        }
        SearchMode::AnyWord => {
            let mut words: Vec<String> = Vec::new();
            for word in &key.words {
                if index.contains(word) && !words.contains(word) {
                    words.push(word.clone());
                }
            }
            if words.is_empty() {
                let word = key.words.into_iter().next().unwrap_or_default();
                return Err(SearchError::WordNotFound { word });
            }
            let candidates: BTreeSet<Position> = words
                .iter()
                .filter_map(|word| index.get(word))
                .flat_map(|positions| within(positions, scope))
                .collect();
            let hits = every_word(&words, candidates, text)?;
            let total = hits.occurs.len();
            Ok((words.join(" "), hits, total))
        }
        SearchMode::Substring | SearchMode::Regex => Err(SearchError::EmptyKey),
    }
}

/// Position sets for each word; the first word missing from the index fails.
fn known_sets<'a>(index: &'a WordIndex, words: &[String]) -> Result<Vec<&'a BTreeSet<Position>>, SearchError> {
    words
        .iter()
        .map(|word| {
            index.get(word).ok_or_else(|| {
                tracing::warn!("Word not in index: {:?}", word);
                SearchError::WordNotFound { word: word.clone() }
            })
        })
        .collect()
}

/// Members of `set` inside `scope`; a reversed scope holds nothing.
fn within(set: &BTreeSet<Position>, scope: Scope) -> impl Iterator<Item = Position> + '_ {
    let range = (scope.first <= scope.last).then(|| set.range(scope.first..=scope.last));
    range.into_iter().flatten().copied()
}

fn intersection(sets: &[&BTreeSet<Position>], scope: Scope) -> Vec<Position> {
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };
    within(first, scope)
        .filter(|position| rest.iter().all(|set| set.contains(position)))
        .collect()
}

/// Spans of every word per candidate, sorted by start, then ranked.
fn every_word<'t>(
    words: &[String],
    candidates: impl IntoIterator<Item = Position>,
    text: impl Fn(Position) -> &'t str,
) -> Result<Hits, SearchError> {
    let patterns = words
        .iter()
        .map(|word| compile(&whole_word_pattern(word)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut hits = Hits::default();
    for position in candidates {
        let verse = text(position);
        let mut spans: Vec<Span> = patterns.iter().flat_map(|regex| find_spans(regex, verse)).collect();
        spans.sort_by_key(|span| span.start);
        hits.push(position, spans);
    }
    rank(&mut hits.occurs, &mut hits.occur);
    Ok(hits)
}

/// Order verses by match count, most first; verses with equal counts stay in
/// ascending position order.
///
/// Sorts `(count, position)` descending, then reverses each run of equal
/// count.
pub fn rank(occurs: &mut Vec<Position>, occur: &mut Vec<Vec<Span>>) {
    let mut ranked: Vec<(usize, Position, Vec<Span>)> = occurs
        .drain(..)
        .zip(occur.drain(..))
        .map(|(position, spans)| (spans.len(), position, spans))
        .collect();
    ranked.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    for run in ranked.chunk_by_mut(|a, b| a.0 == b.0) {
        run.reverse();
    }
    for (_, position, spans) in ranked {
        occurs.push(position);
        occur.push(spans);
    }
}
