//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.
//! Reference, search and navigation failures each have their own enum so the
//! caller can tell which field or word was at fault; all of them are
//! recoverable and none aborts the process.

use std::fmt;

use thiserror::Error;

use crate::bible::position::Position;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// File parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Corpus tables are inconsistent with each other
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Reference resolution failed
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Search failed
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Occurrence navigation failed
    #[error(transparent)]
    Navigator(#[from] NavigatorError),

    /// Book/chapter/verse stepping or history failed
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

impl Error {
    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create a corpus consistency error
    pub fn corpus(message: impl Into<String>) -> Self {
        Self::Corpus(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

/// A component of a book/chapter/verse reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The book name or abbreviation.
    Book,
    /// The chapter number.
    Chapter,
    /// The verse number.
    Verse,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Book => "book",
            Self::Chapter => "chapter",
            Self::Verse => "verse",
        })
    }
}

/// Why a reference string could not be turned into a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The text does not look like any accepted reference shape.
    #[error("Invalid format: {input:?}. Please enter a valid reference")]
    InvalidFormat {
        /// The reference after cleanup.
        input: String,
    },

    /// The book token is not in the abbreviation table.
    #[error("Not a book name: {token:?}")]
    UnknownBook {
        /// The unrecognised book token.
        token: String,
    },

    /// The chapter token is neither a Roman numeral nor an integer.
    #[error("Invalid chapter: {token:?}")]
    InvalidChapter {
        /// The offending chapter token.
        token: String,
    },

    /// The verse token is neither a Roman numeral nor an integer.
    #[error("Invalid verse: {token:?}")]
    InvalidVerse {
        /// The offending verse token.
        token: String,
    },

    /// The reference parsed but names a verse that does not exist.
    ///
    /// Recoverable: `fallback` is where the caller should go instead.
    #[error("The {field} is out of bounds in {reference:?}")]
    OutOfRange {
        /// The normalised reference that was looked up.
        reference: String,
        /// Which component was out of range.
        field: Field,
        /// Position to show instead.
        fallback: Position,
    },
}

impl ReferenceError {
    /// The position a caller should fall back to, if the error is recoverable.
    pub const fn fallback(&self) -> Option<Position> {
        match self {
            Self::OutOfRange { fallback, .. } => Some(*fallback),
            _ => None,
        }
    }
}

/// Why a search produced no result set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Nothing left to search for after normalisation.
    #[error("Nothing to find")]
    EmptyKey,

    /// A word of a multi-word key is absent from the word index.
    #[error("Word not found: {word:?}")]
    WordNotFound {
        /// The missing word.
        word: String,
    },

    /// The regular expression did not compile.
    #[error("Regular Expression Error: {message}")]
    RegexCompile {
        /// The pattern as submitted.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },

    /// The search ran but found nothing in scope.
    #[error("Not found: {key:?}")]
    NoMatches {
        /// The normalised key.
        key: String,
    },

    /// The book scope names a book outside the corpus.
    #[error("Invalid search scope: books {first}..={last}")]
    InvalidScope {
        /// First book of the requested scope (zero-based).
        first: usize,
        /// Last book of the requested scope (zero-based).
        last: usize,
    },
}

/// Why "find next" could not produce a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigatorError {
    /// No search has been run yet.
    #[error("No search in progress")]
    NoSearch,

    /// The last search found nothing.
    #[error("Not found...")]
    NoResults,

    /// Every match has been visited.
    #[error("Search completed: no more matches")]
    Exhausted,
}

/// Unit of movement for book/chapter/verse stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Whole books.
    Book,
    /// Chapters.
    Chapter,
    /// Single verses.
    Verse,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Book => "book",
            Self::Chapter => "chapter",
            Self::Verse => "verse",
        })
    }
}

/// Why a step or history move was refused. The current position is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Already at the first book/chapter/verse.
    #[error("No earlier {0}!")]
    NoEarlier(Unit),

    /// Already at the last book/chapter/verse.
    #[error("No later {0}!")]
    NoLater(Unit),

    /// The requested history stack is empty.
    #[error("Nothing to go {0} to")]
    EmptyHistory(&'static str),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn out_of_range_carries_fallback() {
        let err = ReferenceError::OutOfRange {
            reference: "genesis.99.1".to_string(),
            field: Field::Chapter,
            fallback: Position::new(0),
        };
        assert_eq!(err.fallback(), Some(Position::new(0)));
        assert!(err.to_string().contains("chapter"));
        assert_eq!(ReferenceError::UnknownBook { token: "x".into() }.fallback(), None);
    }

    #[test]
    fn navigation_messages_name_the_unit() {
        assert_eq!(NavigationError::NoEarlier(Unit::Book).to_string(), "No earlier book!");
        assert_eq!(NavigationError::NoLater(Unit::Chapter).to_string(), "No later chapter!");
    }

    #[test]
    fn domain_errors_convert_into_application_error() {
        let err: Error = SearchError::EmptyKey.into();
        assert!(matches!(err, Error::Search(SearchError::EmptyKey)));
    }
}
