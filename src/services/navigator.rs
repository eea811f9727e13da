//! Step through a search result one occurrence at a time.
//!
//! The [`Navigator`] owns a [`SearchResult`] and a [`Cursor`] naming the next
//! match to produce. The cursor is plain data, so a session can store it in a
//! history snapshot and [`Navigator::restore`] it later.

use serde::{Deserialize, Serialize};

use crate::bible::position::Position;
use crate::corpus::{Bible, Case};
use crate::error::{NavigatorError, SearchError};
use crate::services::offsets::{map_raw_span, map_word_span, DisplaySpan};
use crate::services::search::{search, SearchMode, SearchRequest, SearchResult, Span};

/// Lifecycle of a navigator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigatorState {
    /// No search has been started.
    #[default]
    Idle,
    /// A search is running.
    Searching,
    /// Matches remain to be visited.
    HasResults,
    /// The last search found nothing.
    NoResults,
    /// Every match has been visited.
    Exhausted,
}

/// Scan point for substring searches: the display text is searched again
/// from here on each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScan {
    /// Verse being scanned.
    pub position: Position,
    /// Character offset to resume from.
    pub offset: usize,
}

/// Where the next match comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Index into `occurs`.
    pub verse_index: usize,
    /// Index into the spans of that verse.
    pub match_index: usize,
    /// Matches produced so far.
    pub occurrence: usize,
    /// Substring scan point.
    pub raw: Option<RawScan>,
}

/// One match, ready to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Verse containing the match.
    pub position: Position,
    /// Spans in the searched text.
    pub spans: Vec<Span>,
    /// Highlight in the display text.
    pub display: DisplaySpan,
    /// 1-based number of this match.
    pub occurrence: usize,
    /// Matches in the result.
    pub total: usize,
}

impl Match {
    /// Whether this is the final match of the result.
    pub const fn is_last(&self) -> bool {
        self.occurrence >= self.total
    }
}

/// Occurrence iterator over one search result.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: NavigatorState,
    result: Option<SearchResult>,
    cursor: Cursor,
    last: Option<Match>,
}

impl Navigator {
    /// A navigator positioned before the first match of `result`.
    pub fn with_result(result: SearchResult) -> Self {
        let state = if result.total == 0 {
            NavigatorState::NoResults
        } else {
            NavigatorState::HasResults
        };
        Self { state, result: Some(result), cursor: Cursor::default(), last: None }
    }

    /// Run `request` and position before its first match.
    pub fn start(&mut self, bible: &Bible, request: &SearchRequest) -> Result<(), SearchError> {
        self.state = NavigatorState::Searching;
        self.cursor = Cursor::default();
        self.last = None;
        match search(bible, request) {
            Ok(result) => {
                *self = Self::with_result(result);
                Ok(())
            }
            Err(e) => {
                self.result = None;
                self.state = NavigatorState::NoResults;
                Err(e)
            }
        }
    }

    /// Produce the next match.
    pub fn advance(&mut self, bible: &Bible) -> Result<Match, NavigatorError> {
        match self.state {
            NavigatorState::Idle | NavigatorState::Searching => return Err(NavigatorError::NoSearch),
            NavigatorState::NoResults => return Err(NavigatorError::NoResults),
            NavigatorState::Exhausted => return Err(NavigatorError::Exhausted),
            NavigatorState::HasResults => {}
        }
        let Some(result) = self.result.as_ref() else {
            return Err(NavigatorError::NoSearch);
        };
        if self.cursor.occurrence >= result.total {
            self.state = NavigatorState::Exhausted;
            return Err(NavigatorError::Exhausted);
        }

        let step = match result.mode {
            SearchMode::Substring => next_raw(bible, result, &mut self.cursor),
            SearchMode::Word | SearchMode::Phrase | SearchMode::Regex => next_span(bible, result, &mut self.cursor),
            SearchMode::AllWords | SearchMode::AnyWord => next_verse(bible, result, &mut self.cursor),
        };
        let Some(mut found) = step else {
            self.state = NavigatorState::Exhausted;
            return Err(NavigatorError::Exhausted);
        };

        self.cursor.occurrence += 1;
        found.occurrence = self.cursor.occurrence;
        found.total = result.total;
        self.last = Some(found.clone());
        Ok(found)
    }

    /// The match most recently produced.
    pub const fn current(&self) -> Option<&Match> {
        self.last.as_ref()
    }

    /// Move the cursor back to a saved point.
    pub fn restore(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.last = None;
        self.state = match &self.result {
            Some(result) if cursor.occurrence < result.total => NavigatorState::HasResults,
            Some(_) => NavigatorState::Exhausted,
            None => NavigatorState::Idle,
        };
    }

    /// Whether `advance` would produce another match.
    pub fn has_next(&self) -> bool {
        self.state == NavigatorState::HasResults
            && self.result.as_ref().is_some_and(|r| self.cursor.occurrence < r.total)
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> NavigatorState {
        self.state
    }

    /// The cursor, for saving.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The result being navigated.
    pub const fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }
}

/// One span at a time: word, phrase and pattern searches.
fn next_span(bible: &Bible, result: &SearchResult, cursor: &mut Cursor) -> Option<Match> {
    let position = *result.occurs.get(cursor.verse_index)?;
    let spans = result.spans(cursor.verse_index);
    let span = *spans.get(cursor.match_index)?;

    cursor.match_index += 1;
    if cursor.match_index >= spans.len() {
        cursor.verse_index += 1;
        cursor.match_index = 0;
    }

    let text = bible.corpus.display(position, Case::Sensitive);
    let display = if result.mode == SearchMode::Regex {
        map_raw_span(text, span.start, span.len())
    } else {
        map_word_span(text, span.start, span.len())
    };
    Some(Match { position, spans: vec![span], display, occurrence: 0, total: 0 })
}

/// One verse at a time: ranked searches highlight from the first span to the last.
fn next_verse(bible: &Bible, result: &SearchResult, cursor: &mut Cursor) -> Option<Match> {
    let position = *result.occurs.get(cursor.verse_index)?;
    let spans = result.spans(cursor.verse_index).to_vec();
    let start = spans.first()?.start;
    let end = spans.iter().map(|s| s.end).max().unwrap_or(start);

    cursor.verse_index += 1;
    cursor.match_index = 0;

    let text = bible.corpus.display(position, Case::Sensitive);
    let display = map_word_span(text, start, end - start);
    Some(Match { position, spans, display, occurrence: 0, total: 0 })
}

/// Substring searches find the key again in the display text from the scan point.
fn next_raw(bible: &Bible, result: &SearchResult, cursor: &mut Cursor) -> Option<Match> {
    let scope = result.scope;
    let scan = cursor.raw.get_or_insert(RawScan { position: scope.first, offset: 0 });
    let key_len = result.key.chars().count();

    let (mut position, mut offset) = (scan.position, scan.offset);
    while position <= scope.last {
        let text = bible.corpus.display(position, result.case);
        if let Some(start) = find_from(text, &result.key, offset) {
            *scan = RawScan { position, offset: start + key_len };
            let display = map_raw_span(bible.corpus.display(position, Case::Sensitive), start, key_len);
            let span = Span { start, end: start + key_len };
            return Some(Match { position, spans: vec![span], display, occurrence: 0, total: 0 });
        }
        position = Position::new(position.index() + 1);
        offset = 0;
    }
    *scan = RawScan { position, offset: 0 };
    None
}

/// Character offset of `key` in `text` at or after character `offset`.
fn find_from(text: &str, key: &str, offset: usize) -> Option<usize> {
    let from = if offset == 0 {
        0
    } else {
        text.char_indices().nth(offset).map(|(at, _)| at)?
    };
    let at = text[from..].find(key)?;
    Some(offset + text[from..from + at].chars().count())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::test_support::fixture_bible;

    fn started(bible: &Bible, key: &str, mode: SearchMode, case: Case) -> Navigator {
        let mut navigator = Navigator::default();
        let request = SearchRequest::new(key, mode, case, bible.model.whole());
        navigator.start(bible, &request).unwrap();
        navigator
    }

    fn drain(bible: &Bible, navigator: &mut Navigator) -> Vec<Match> {
        std::iter::from_fn(|| navigator.advance(bible).ok()).collect()
    }

    #[test]
    fn test_idle_and_empty() {
        let bible = fixture_bible();
        let mut navigator = Navigator::default();
        assert_eq!(navigator.advance(&bible), Err(NavigatorError::NoSearch));

        let request = SearchRequest::new("unicorn", SearchMode::Word, Case::Insensitive, bible.model.whole());
        assert!(navigator.start(&bible, &request).is_err());
        assert_eq!(navigator.state(), NavigatorState::NoResults);
        assert_eq!(navigator.advance(&bible), Err(NavigatorError::NoResults));
    }

    #[test]
    fn test_word_matches_then_exhausted() {
        let bible = fixture_bible();
        let mut navigator = started(&bible, "earth", SearchMode::Word, Case::Sensitive);
        assert!(navigator.has_next());
        let matches = drain(&bible, &mut navigator);
        assert!(!navigator.has_next());

        let positions: Vec<usize> = matches.iter().map(|m| m.position.index()).collect();
        assert_eq!(positions, [0, 1, 2]);
        assert_eq!(matches[1].display, DisplaySpan { start: 8, len: 5 });
        assert_eq!(matches[2].occurrence, 3);
        assert!(matches[2].is_last());

        assert_eq!(navigator.state(), NavigatorState::Exhausted);
        assert_eq!(navigator.advance(&bible), Err(NavigatorError::Exhausted));
    }

    #[test]
    fn test_phrase_steps_through_each_span() {
        let bible = fixture_bible();
        let mut navigator = started(&bible, "the LORD", SearchMode::Phrase, Case::Insensitive);
        let matches = drain(&bible, &mut navigator);
        let positions: Vec<usize> = matches.iter().map(|m| m.position.index()).collect();
        assert_eq!(positions, [3, 5, 29, 29, 30]);
        assert_eq!(matches.len(), navigator.result().unwrap().total);
    }

    #[test]
    fn test_substring_rescans_display_text() {
        let bible = fixture_bible();
        let mut navigator = started(&bible, "lord", SearchMode::Substring, Case::Insensitive);
        let matches = drain(&bible, &mut navigator);
        let positions: Vec<usize> = matches.iter().map(|m| m.position.index()).collect();
        assert_eq!(positions, [3, 5, 29, 29, 30]);
        assert_eq!(matches[2].display, DisplaySpan { start: 4, len: 4 });
        assert_eq!(matches[3].display, DisplaySpan { start: 49, len: 4 });
        assert_eq!(navigator.advance(&bible), Err(NavigatorError::Exhausted));
    }

    #[test]
    fn test_ranked_modes_step_per_verse() {
        let bible = fixture_bible();
        let mut navigator = started(&bible, "lord moses", SearchMode::AnyWord, Case::Insensitive);
        let matches = drain(&bible, &mut navigator);
        let positions: Vec<usize> = matches.iter().map(|m| m.position.index()).collect();
        assert_eq!(positions, [5, 29, 3, 30]);
        assert_eq!(matches[0].spans.len(), 2);
        assert_eq!(matches[0].display, DisplaySpan { start: 8, len: 20 });
    }

    #[test]
    fn test_regex_uses_display_offsets() {
        let bible = fixture_bible();
        let mut navigator = started(&bible, "L.RD", SearchMode::Regex, Case::Sensitive);
        let matches = drain(&bible, &mut navigator);
        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0].display, DisplaySpan { start: 8, len: 4 });
    }

    #[test]
    fn test_current_and_restore() {
        let bible = fixture_bible();
        let mut navigator = started(&bible, "lord", SearchMode::Substring, Case::Insensitive);
        assert!(navigator.current().is_none());

        navigator.advance(&bible).unwrap();
        let second = navigator.advance(&bible).unwrap();
        assert_eq!(navigator.current(), Some(&second));

        let saved: Cursor = serde_json::from_str(&serde_json::to_string(&navigator.cursor()).unwrap()).unwrap();
        let third = navigator.advance(&bible).unwrap();
        drain(&bible, &mut navigator);
        assert_eq!(navigator.state(), NavigatorState::Exhausted);

        navigator.restore(saved);
        assert_eq!(navigator.state(), NavigatorState::HasResults);
        assert_eq!(navigator.advance(&bible).unwrap(), third);
    }
}
