//! Reading session.
//!
//! A [`Session`] is the reader's place in the text: the current verse, the
//! highlighted match, the active search and the back/forward history. Every
//! operation goes through `&mut self`; the [`Bible`] it reads is borrowed and
//! never changes.

use crate::bible::books::book_key;
use crate::bible::position::{Locus, Position};
use crate::bible::reference::{resolve, ReferenceContext};
use crate::bible::Citation;
use crate::config::Config;
use crate::corpus::{Bible, Case};
use crate::error::{Error, NavigationError, NavigatorError, ReferenceError, Unit};
use crate::services::history::{History, Snapshot};
use crate::services::navigator::{Match, Navigator};
use crate::services::offsets::DisplaySpan;
use crate::services::search::SearchRequest;

/// The reader's state over one loaded Bible.
#[derive(Debug)]
pub struct Session<'a> {
    bible: &'a Bible,
    translation: String,
    position: Position,
    offset: Option<usize>,
    highlight: Option<DisplaySpan>,
    status: String,
    search: Option<SearchRequest>,
    navigator: Option<Navigator>,
    history: History,
    find_open: bool,
}

impl<'a> Session<'a> {
    /// Start at the first verse.
    pub fn new(bible: &'a Bible, translation: impl Into<String>) -> Self {
        let mut session = Self {
            bible,
            translation: translation.into(),
            position: Position::default(),
            offset: None,
            highlight: None,
            status: String::new(),
            search: None,
            navigator: None,
            history: History::new(),
            find_open: false,
        };
        session.show(Position::default());
        session
    }

    /// Start at the first verse, labelled with the configured translation.
    pub fn from_config(bible: &'a Bible, config: &Config) -> Self {
        Self::new(bible, config.translation.clone())
    }

    /// The verse shown.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Book, chapter and verse of the verse shown.
    pub fn locus(&self) -> Locus {
        self.bible.model.position_to_locus(self.position)
    }

    /// Display text of the verse shown.
    pub fn verse_text(&self) -> &'a str {
        self.bible.corpus.display(self.position, Case::Sensitive)
    }

    /// Character offset of the highlighted match.
    pub const fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Highlight in the display text.
    pub const fn highlight(&self) -> Option<DisplaySpan> {
        self.highlight
    }

    /// The status line.
    pub fn status_message(&self) -> &str {
        &self.status
    }

    /// The active navigator, if a search is running.
    pub const fn navigator(&self) -> Option<&Navigator> {
        self.navigator.as_ref()
    }

    /// Back/forward history.
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Whether the find panel is open.
    pub const fn is_find_open(&self) -> bool {
        self.find_open
    }

    /// Jump to a typed reference.
    ///
    /// An out-of-range reference still moves to its fallback verse and is
    /// reported as an error.
    pub fn goto(&mut self, reference: &str) -> Result<Position, ReferenceError> {
        self.leave();
        let context = ReferenceContext { book: 0, chapter: 0, position: self.position };
        match resolve(&self.bible.model, reference, &context) {
            Ok(position) => {
                self.show(position);
                Ok(position)
            }
            Err(e) => {
                tracing::warn!("Could not go to {:?}: {}", reference, e);
                if let Some(fallback) = e.fallback() {
                    self.show(fallback);
                }
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    /// Jump to a zero-based book, chapter and verse.
    pub fn goto_locus(&mut self, locus: Locus) -> Result<Position, ReferenceError> {
        let Some(book) = book_key(locus.book) else {
            return Err(ReferenceError::UnknownBook { token: locus.book.to_string() });
        };
        self.goto(&format!("{book} {}.{}", locus.chapter + 1, locus.verse + 1))
    }

    /// First verse of the previous book.
    pub fn earlier_book(&mut self) -> Result<Position, NavigationError> {
        let target = self.bible.model.earlier_book(self.position);
        self.step(target, NavigationError::NoEarlier(Unit::Book))
    }

    /// First verse of the next book.
    pub fn later_book(&mut self) -> Result<Position, NavigationError> {
        let target = self.bible.model.later_book(self.position);
        self.step(target, NavigationError::NoLater(Unit::Book))
    }

    /// First verse of the previous chapter.
    pub fn earlier_chapter(&mut self) -> Result<Position, NavigationError> {
        let target = self.bible.model.earlier_chapter(self.position);
        self.step(target, NavigationError::NoEarlier(Unit::Chapter))
    }

    /// First verse of the next chapter.
    pub fn later_chapter(&mut self) -> Result<Position, NavigationError> {
        let target = self.bible.model.later_chapter(self.position);
        self.step(target, NavigationError::NoLater(Unit::Chapter))
    }

    /// The verse before this one.
    pub fn previous_verse(&mut self) -> Result<Position, NavigationError> {
        let target = self.bible.model.previous_verse(self.position);
        self.step(target, NavigationError::NoEarlier(Unit::Verse))
    }

    /// The verse after this one.
    pub fn next_verse(&mut self) -> Result<Position, NavigationError> {
        let target = self.bible.model.next_verse(self.position);
        self.step(target, NavigationError::NoLater(Unit::Verse))
    }

    /// Run a new search and show its first match.
    pub fn find(&mut self, request: SearchRequest) -> Result<Match, Error> {
        let snapshot = self.snapshot();
        self.history.clear_forward();
        self.history.push_back(snapshot);

        let mut navigator = Navigator::default();
        if let Err(e) = navigator.start(self.bible, &request) {
            self.clear_search();
            self.status = e.to_string();
            return Err(e.into());
        }
        self.search = Some(request);
        self.navigator = Some(navigator);
        self.advance()
    }

    /// Show the next match of the active search.
    ///
    /// After going back, the entries ahead are folded into the back history
    /// before moving on.
    pub fn find_next(&mut self) -> Result<Match, Error> {
        if self.navigator.as_ref().is_some_and(Navigator::has_next) {
            let snapshot = self.snapshot();
            if self.history.forward_len() > 0 {
                self.history.push_back(snapshot);
                self.history.merge_forward();
            } else {
                self.history.clear_forward();
                self.history.push_back(snapshot);
            }
        }
        self.advance()
    }

    /// Return to the previous view.
    pub fn back(&mut self) -> Result<Position, NavigationError> {
        if self.history.back_len() == 0 {
            return Err(NavigationError::EmptyHistory("back"));
        }
        let current = self.snapshot();
        self.history.push_forward(current);
        let snapshot = self.history.pop_back().ok_or(NavigationError::EmptyHistory("back"))?;
        self.restore(snapshot);
        Ok(self.position)
    }

    /// Undo the last `back`.
    pub fn forward(&mut self) -> Result<Position, NavigationError> {
        if self.history.forward_len() == 0 {
            return Err(NavigationError::EmptyHistory("forward"));
        }
        let current = self.snapshot();
        self.history.push_back(current);
        let snapshot = self.history.pop_forward().ok_or(NavigationError::EmptyHistory("forward"))?;
        self.restore(snapshot);
        Ok(self.position)
    }

    /// Open the find panel, remembering where the search started.
    pub fn open_find(&mut self) {
        let snapshot = self.snapshot();
        self.history.clear_forward();
        self.history.push_back(snapshot);
        self.find_open = true;
    }

    /// Close the find panel.
    pub fn close_find(&mut self) {
        self.find_open = false;
    }

    /// Record the current view, drop the search and clear the forward stack
    /// before a fresh move.
    fn leave(&mut self) {
        let snapshot = self.snapshot();
        self.clear_search();
        self.history.clear_forward();
        self.history.push_back(snapshot);
    }

    fn step(&mut self, target: Option<Position>, refusal: NavigationError) -> Result<Position, NavigationError> {
        let Some(target) = target else {
            tracing::warn!("{}", refusal);
            self.status = refusal.to_string();
            return Err(refusal);
        };
        self.leave();
        self.show(target);
        Ok(target)
    }

    fn advance(&mut self) -> Result<Match, Error> {
        let Some(navigator) = self.navigator.as_mut() else {
            self.status = NavigatorError::NoSearch.to_string();
            return Err(NavigatorError::NoSearch.into());
        };
        match navigator.advance(self.bible) {
            Ok(found) => {
                let key = navigator.result().map(|r| r.key.clone()).unwrap_or_default();
                self.position = found.position;
                self.offset = found.spans.first().map(|s| s.start);
                self.highlight = Some(found.display);
                self.status = self.occurrence_status(found.occurrence, found.total, &key);
                Ok(found)
            }
            Err(e) => {
                self.status = e.to_string();
                Err(e.into())
            }
        }
    }

    fn clear_search(&mut self) {
        self.search = None;
        self.navigator = None;
        self.offset = None;
        self.highlight = None;
    }

    fn show(&mut self, position: Position) {
        self.position = position;
        self.offset = None;
        self.highlight = None;
        self.status = self.citation();
    }

    fn citation(&self) -> String {
        Citation::at(&self.bible.model, self.position).display(&self.translation)
    }

    fn occurrence_status(&self, occurrence: usize, total: usize, key: &str) -> String {
        let end = if occurrence >= total { "." } else { "..." };
        format!("Occurrence {occurrence}/{total} of \"{key}\"  -  {}{end}", self.citation())
    }

    fn snapshot(&self) -> Snapshot {
        let navigator = self.navigator.as_ref();
        let cursor = navigator.map(Navigator::cursor);
        Snapshot {
            position: self.position,
            offset: self.offset,
            highlight: self.highlight,
            occurrence: cursor.map_or(0, |c| c.occurrence),
            total: navigator.and_then(Navigator::result).map_or(0, |r| r.total),
            search: self.search.clone(),
            cursor,
            find_open: self.find_open,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        tracing::debug!("Restoring view at {}", snapshot.position);
        self.position = snapshot.position;
        self.offset = snapshot.offset;
        self.highlight = snapshot.highlight;
        self.find_open = snapshot.find_open;

        let (Some(request), Some(cursor)) = (snapshot.search, snapshot.cursor) else {
            self.search = None;
            self.navigator = None;
            self.status = self.citation();
            return;
        };

        if self.search.as_ref() != Some(&request) || self.navigator.is_none() {
            let mut navigator = Navigator::default();
            if let Err(e) = navigator.start(self.bible, &request) {
                tracing::warn!("Could not restore search {:?}: {}", request.key, e);
                self.search = None;
                self.navigator = None;
                self.status = self.citation();
                return;
            }
            self.navigator = Some(navigator);
        }
        let key = self.navigator.as_mut().map_or_else(String::new, |navigator| {
            navigator.restore(cursor);
            navigator.result().map(|r| r.key.clone()).unwrap_or_default()
        });
        self.search = Some(request);

        self.status = if snapshot.occurrence > 0 {
            self.occurrence_status(snapshot.occurrence, snapshot.total, &key)
        } else {
            self.citation()
        };
    }
}
