//! Absolute verse positions and their book/chapter/verse coordinates.
//!
//! The model is built once from the `Info` table (one [`Locus`] per verse in
//! reading order) and is read-only afterwards.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, SearchError};

/// Zero-based absolute index of a verse in reading order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(usize);

impl Position {
    /// Wrap a raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Zero-based `(book, chapter, verse)` coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Locus {
    /// Book index.
    pub book: usize,
    /// Chapter index within the book.
    pub chapter: usize,
    /// Verse index within the chapter.
    pub verse: usize,
}

impl Locus {
    /// Build a locus from zero-based parts.
    pub const fn new(book: usize, chapter: usize, verse: usize) -> Self {
        Self { book, chapter, verse }
    }

    /// Whether `next` may directly follow `self` in reading order.
    const fn precedes(self, next: Self) -> bool {
        (next.book == self.book && next.chapter == self.chapter && next.verse == self.verse + 1)
            || (next.book == self.book && next.chapter == self.chapter + 1 && next.verse == 0)
            || (next.book == self.book + 1 && next.chapter == 0 && next.verse == 0)
    }
}

impl From<[usize; 3]> for Locus {
    fn from([book, chapter, verse]: [usize; 3]) -> Self {
        Self::new(book, chapter, verse)
    }
}

/// Inclusive range of positions a search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// First position in scope (`x1`).
    pub first: Position,
    /// Last position in scope (`x2`).
    pub last: Position,
}

impl Scope {
    /// Whether `position` lies inside the scope.
    pub fn contains(&self, position: Position) -> bool {
        self.first <= position && position <= self.last
    }

    /// Iterate every position in scope.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (self.first.index()..=self.last.index()).map(Position::new)
    }
}

/// Bidirectional mapping between positions and loci.
#[derive(Debug, Clone)]
pub struct PositionModel {
    info: Vec<Locus>,
    index: HashMap<Locus, Position>,
    /// First position of each book, plus the end sentinel.
    book_bounds: Vec<usize>,
    /// First position of each chapter, per book.
    chapter_starts: Vec<Vec<usize>>,
}

impl PositionModel {
    /// Validate an `Info` table and index it.
    pub fn new(info: Vec<Locus>) -> Result<Self> {
        match info.first() {
            None => return Err(Error::corpus("the position table is empty")),
            Some(first) if *first != Locus::default() => {
                return Err(Error::corpus(format!("the position table starts at {first:?}")));
            }
            Some(_) => {}
        }

        let mut index = HashMap::with_capacity(info.len());
        let mut book_bounds = Vec::new();
        let mut chapter_starts: Vec<Vec<usize>> = Vec::new();

        for (i, locus) in info.iter().enumerate() {
            if i > 0 && !info[i - 1].precedes(*locus) {
                return Err(Error::corpus(format!(
                    "position {i} jumps from {:?} to {locus:?}",
                    info[i - 1]
                )));
            }
            if locus.verse == 0 {
                if locus.chapter == 0 {
                    book_bounds.push(i);
                    chapter_starts.push(Vec::new());
                }
                if let Some(chapters) = chapter_starts.last_mut() {
                    chapters.push(i);
                }
            }
            index.insert(*locus, Position::new(i));
        }
        book_bounds.push(info.len());

        tracing::debug!(
            "Position model: {} verses in {} books",
            info.len(),
            chapter_starts.len()
        );

        Ok(Self { info, index, book_bounds, chapter_starts })
    }

    /// Build the `Info` table from per-book chapter lengths.
    pub fn from_chapter_lengths(books: &[Vec<usize>]) -> Result<Self> {
        let mut info = Vec::with_capacity(books.iter().flatten().sum());
        for (book, chapters) in books.iter().enumerate() {
            for (chapter, &verses) in chapters.iter().enumerate() {
                if verses == 0 {
                    return Err(Error::corpus(format!(
                        "book {book} chapter {chapter} has no verses"
                    )));
                }
                info.extend((0..verses).map(|verse| Locus::new(book, chapter, verse)));
            }
        }
        Self::new(info)
    }

    /// Number of verses.
    pub fn len(&self) -> usize {
        self.info.len()
    }

    /// Always false for a validated model.
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// The last verse.
    pub fn last(&self) -> Position {
        Position::new(self.info.len().saturating_sub(1))
    }

    /// Whether `position` addresses a verse.
    pub fn contains(&self, position: Position) -> bool {
        position.index() < self.info.len()
    }

    /// Exact lookup; `None` when no such verse exists.
    pub fn locus_to_position(&self, locus: Locus) -> Option<Position> {
        self.index.get(&locus).copied()
    }

    /// Coordinates of a position. Out-of-range positions are clamped first.
    pub fn position_to_locus(&self, position: Position) -> Locus {
        self.info[position.index().min(self.info.len() - 1)]
    }

    /// Saturate a signed index into `[0, N-1]`.
    pub fn clamp(&self, index: isize) -> Position {
        usize::try_from(index).map_or(Position::new(0), |i| Position::new(i.min(self.len() - 1)))
    }

    /// First position of each book, plus the end sentinel.
    pub fn book_bounds(&self) -> &[usize] {
        &self.book_bounds
    }

    /// Number of books.
    pub fn book_count(&self) -> usize {
        self.chapter_starts.len()
    }

    /// First verse of a book.
    pub fn book_start(&self, book: usize) -> Option<Position> {
        (book < self.book_count()).then(|| Position::new(self.book_bounds[book]))
    }

    /// Last verse of a book.
    pub fn book_end(&self, book: usize) -> Option<Position> {
        (book < self.book_count()).then(|| Position::new(self.book_bounds[book + 1] - 1))
    }

    /// Number of chapters in a book (zero for an unknown book).
    pub fn chapter_count(&self, book: usize) -> usize {
        self.chapter_starts.get(book).map_or(0, Vec::len)
    }

    /// First verse of a chapter.
    pub fn chapter_start(&self, book: usize, chapter: usize) -> Option<Position> {
        self.chapter_starts
            .get(book)
            .and_then(|chapters| chapters.get(chapter))
            .map(|&i| Position::new(i))
    }

    /// Number of verses in a chapter (zero for an unknown chapter).
    pub fn verse_count(&self, book: usize, chapter: usize) -> usize {
        let Some(start) = self.chapter_start(book, chapter) else {
            return 0;
        };
        let end = self
            .chapter_start(book, chapter + 1)
            .or_else(|| self.book_start(book + 1))
            .map_or(self.len(), Position::index);
        end - start.index()
    }

    /// Translate an inclusive book range into a position scope.
    ///
    /// Books given in reverse order are swapped.
    pub fn book_range_to_position_range(
        &self,
        first_book: usize,
        last_book: usize,
    ) -> std::result::Result<Scope, SearchError> {
        let (first_book, last_book) = if first_book > last_book {
            (last_book, first_book)
        } else {
            (first_book, last_book)
        };
        match (self.book_start(first_book), self.book_end(last_book)) {
            (Some(first), Some(last)) => Ok(Scope { first, last }),
            _ => Err(SearchError::InvalidScope { first: first_book, last: last_book }),
        }
    }

    /// The scope covering every verse.
    pub fn whole(&self) -> Scope {
        Scope { first: Position::new(0), last: self.last() }
    }

    /// First verse of the previous book.
    pub fn earlier_book(&self, position: Position) -> Option<Position> {
        let book = self.position_to_locus(position).book;
        book.checked_sub(1).and_then(|b| self.book_start(b))
    }

    /// First verse of the next book.
    pub fn later_book(&self, position: Position) -> Option<Position> {
        self.book_start(self.position_to_locus(position).book + 1)
    }

    /// First verse of the previous chapter, crossing into the previous book.
    pub fn earlier_chapter(&self, position: Position) -> Option<Position> {
        let Locus { book, chapter, .. } = self.position_to_locus(position);
        match chapter.checked_sub(1) {
            Some(previous) => self.chapter_start(book, previous),
            None => {
                let previous_book = book.checked_sub(1)?;
                let last_chapter = self.chapter_count(previous_book).checked_sub(1)?;
                self.chapter_start(previous_book, last_chapter)
            }
        }
    }

    /// First verse of the next chapter, crossing into the next book.
    pub fn later_chapter(&self, position: Position) -> Option<Position> {
        let Locus { book, chapter, .. } = self.position_to_locus(position);
        self.chapter_start(book, chapter + 1)
            .or_else(|| self.book_start(book + 1))
    }

    /// The verse before `position`.
    pub fn previous_verse(&self, position: Position) -> Option<Position> {
        position.index().checked_sub(1).map(Position::new)
    }

    /// The verse after `position`.
    pub fn next_verse(&self, position: Position) -> Option<Position> {
        let next = Position::new(position.index() + 1);
        self.contains(next).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::test_support::kjv_shaped_model;

    fn tiny() -> PositionModel {
        // Book 0: chapters of 3 and 2 verses; book 1: one chapter of 4 verses.
        PositionModel::from_chapter_lengths(&[vec![3, 2], vec![4]]).unwrap()
    }

    #[test]
    fn test_round_trip_every_position() {
        let model = kjv_shaped_model();
        assert_eq!(model.len(), crate::constants::corpus::TOTAL_VERSES);
        for i in 0..model.len() {
            let p = Position::new(i);
            assert_eq!(model.locus_to_position(model.position_to_locus(p)), Some(p));
        }
    }

    #[test]
    fn test_book_bounds_match_shipped_table() {
        let model = kjv_shaped_model();
        assert_eq!(model.book_bounds(), &crate::bible::books::KJV_BOOK_BOUNDS[..]);
        assert_eq!(model.book_count(), 66);
    }

    #[test]
    fn test_rejects_gaps() {
        let info = vec![Locus::new(0, 0, 0), Locus::new(0, 0, 2)];
        assert!(PositionModel::new(info).is_err());
        assert!(PositionModel::new(Vec::new()).is_err());
        assert!(PositionModel::new(vec![Locus::new(0, 0, 1)]).is_err());
    }

    #[test]
    fn test_lookup_and_counts() {
        let model = tiny();
        assert_eq!(model.locus_to_position(Locus::new(0, 1, 1)), Some(Position::new(4)));
        assert_eq!(model.locus_to_position(Locus::new(0, 1, 2)), None);
        assert_eq!(model.chapter_count(0), 2);
        assert_eq!(model.verse_count(0, 0), 3);
        assert_eq!(model.verse_count(0, 1), 2);
        assert_eq!(model.verse_count(1, 0), 4);
        assert_eq!(model.verse_count(1, 1), 0);
        assert_eq!(model.book_end(0), Some(Position::new(4)));
    }

    #[test]
    fn test_clamp_saturates() {
        let model = tiny();
        assert_eq!(model.clamp(-5), Position::new(0));
        assert_eq!(model.clamp(3), Position::new(3));
        assert_eq!(model.clamp(400), Position::new(8));
        assert_eq!(model.position_to_locus(Position::new(99)), Locus::new(1, 0, 3));
    }

    #[test]
    fn test_book_range_swaps_reversed_books() {
        let model = tiny();
        let scope = model.book_range_to_position_range(1, 0).unwrap();
        assert_eq!(scope, model.whole());
        assert!(matches!(
            model.book_range_to_position_range(0, 7),
            Err(SearchError::InvalidScope { .. })
        ));
    }

    #[test]
    fn test_stepping_crosses_books() {
        let model = tiny();
        let first = Position::new(0);
        assert_eq!(model.earlier_book(first), None);
        assert_eq!(model.earlier_chapter(first), None);
        assert_eq!(model.previous_verse(first), None);
        assert_eq!(model.later_chapter(first), Some(Position::new(3)));
        assert_eq!(model.later_chapter(Position::new(4)), Some(Position::new(5)));
        assert_eq!(model.earlier_chapter(Position::new(6)), Some(Position::new(3)));
        assert_eq!(model.later_book(Position::new(6)), None);
        assert_eq!(model.later_chapter(Position::new(6)), None);
        assert_eq!(model.next_verse(model.last()), None);
    }
}
