//! Bible structure: books, positions and reference parsing.

pub mod books;
pub mod position;
pub mod reference;
pub mod roman;

pub use position::{Locus, Position, PositionModel, Scope};
pub use reference::{resolve, ReferenceContext};

use books::{book_name, is_single_chapter};

/// Human-facing citation of one verse, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Citation {
    /// Canonical book name.
    pub book: &'static str,
    /// Zero-based book index, kept for the single-chapter check.
    pub book_index: usize,
    /// Chapter number, from 1.
    pub chapter: usize,
    /// Verse number, from 1.
    pub verse: usize,
}

impl Citation {
    /// Citation of the verse at `position`.
    pub fn at(model: &PositionModel, position: Position) -> Self {
        let locus = model.position_to_locus(position);
        Self {
            book: book_name(locus.book).unwrap_or_default(),
            book_index: locus.book,
            chapter: locus.chapter + 1,
            verse: locus.verse + 1,
        }
    }

    /// Format for the status line (e.g., "Genesis 2:3 KJV", "Jude 3 KJV")
    pub fn display(&self, translation: &str) -> String {
        if is_single_chapter(self.book_index) {
            format!("{} {} {translation}", self.book, self.verse)
        } else {
            format!("{} {}:{} {translation}", self.book, self.chapter, self.verse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::kjv_shaped_model;

    #[test]
    fn test_citation_display() {
        let model = kjv_shaped_model();
        let genesis = model.locus_to_position(Locus::new(0, 1, 2)).unwrap_or_default();
        assert_eq!(Citation::at(&model, genesis).display("KJV"), "Genesis 2:3 KJV");

        let jude = model.locus_to_position(Locus::new(64, 0, 2)).unwrap_or_default();
        assert_eq!(Citation::at(&model, jude).display("KJV"), "Jude 3 KJV");
    }
}
