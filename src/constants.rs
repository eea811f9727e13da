//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Corpus shape constants.
pub mod corpus {
    /// Number of addressable verses in the shipped corpus.
    pub const TOTAL_VERSES: usize = 31_102;

    /// Number of books in the canon.
    pub const BOOKS: usize = 66;

    /// Number of chapters in the canon.
    pub const CHAPTERS: usize = 1_189;

    /// Longest chapter (Psalm 119).
    pub const MAX_VERSES_PER_CHAPTER: usize = 176;

    /// Most chapters in one book (Psalms).
    pub const MAX_CHAPTER_COUNT: usize = 150;

    /// Translation label appended to status lines.
    pub const DEFAULT_TRANSLATION: &str = "KJV";
}

/// Search and key normalisation constants.
pub mod search {
    /// Characters stripped from both ends of every word of a search key.
    pub const KEY_STRIP_CHARS: &str = " ()[];:'!<>,.-?";

    /// Typographic apostrophe used by the stripped corpus.
    pub const APOSTROPHE: char = '\u{2019}';
}

/// Offset mapping constants.
pub mod offsets {
    /// Punctuation present in display text but removed from stripped text.
    pub const PUNCTUATION: &str = "()[];:!<>,.-?";

    /// Upper bound on punctuation-window extension rounds.
    pub const MAX_EXTENSION_ROUNDS: usize = 15;

    /// Code points above this occupy an extra display column.
    pub const WIDE_THRESHOLD: u32 = 230;

    /// Paragraph marker carried by display text only.
    pub const PARAGRAPH_MARKER: &str = "¶ ";

    /// Columns occupied by the paragraph marker.
    pub const PARAGRAPH_MARKER_WIDTH: usize = 2;
}

/// Corpus file names inside the corpus directory.
pub mod files {
    /// Position → `[book, chapter, verse]` table.
    pub const INFO: &str = "info.json";

    /// Display text, one verse per line.
    pub const DISPLAY: &str = "display.txt";

    /// Stripped text, one verse per line.
    pub const STRIPPED: &str = "stripped.txt";
}
