//! Checks against an installed corpus directory.

// Only runs when integration tests are explicitly enabled, and skips with a
// message when no corpus is installed.
#![cfg(feature = "integration_test")]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use lectern::bible::books::KJV_BOOK_BOUNDS;
use lectern::bible::position::{Locus, Position};
use lectern::bible::reference::{resolve, ReferenceContext};
use lectern::config::Config;
use lectern::constants::corpus::{CHAPTERS, MAX_CHAPTER_COUNT, MAX_VERSES_PER_CHAPTER, TOTAL_VERSES};
use lectern::corpus::{Bible, Case};
use lectern::services::search::{search, SearchMode, SearchRequest};

fn load_bible() -> Option<Bible> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            println!("Skipping integration test: Failed to load config: {e}");
            return None;
        }
    };
    if !config.has_corpus() {
        println!("Skipping integration test: no corpus at {}", config.corpus_path.display());
        return None;
    }
    Some(Bible::load(&config.corpus_path).expect("corpus should load"))
}

#[test]
fn corpus_has_the_expected_shape() {
    let Some(bible) = load_bible() else { return };
    assert_eq!(bible.model.len(), TOTAL_VERSES);
    assert_eq!(bible.model.book_bounds(), KJV_BOOK_BOUNDS);

    let chapters: usize = (0..bible.model.book_count()).map(|b| bible.model.chapter_count(b)).sum();
    assert_eq!(chapters, CHAPTERS);
    assert_eq!(bible.model.chapter_count(18), MAX_CHAPTER_COUNT);
    assert_eq!(bible.model.verse_count(18, 118), MAX_VERSES_PER_CHAPTER);
}

#[test]
fn well_known_references() {
    let Some(bible) = load_bible() else { return };
    let context = ReferenceContext::default();
    let at = |book, chapter, verse| bible.model.locus_to_position(Locus::new(book, chapter, verse)).unwrap();

    assert_eq!(resolve(&bible.model, "Gen 2.3", &context), Ok(at(0, 1, 2)));
    assert_eq!(resolve(&bible.model, "John 3:16", &context), Ok(at(42, 2, 15)));
    assert_eq!(resolve(&bible.model, "Rev 22:21", &context), Ok(Position::new(TOTAL_VERSES - 1)));
    assert_eq!(resolve(&bible.model, "Jude 3", &context), Ok(at(64, 0, 2)));
}

#[test]
fn ruth_mentions_the_lord() {
    let Some(bible) = load_bible() else { return };
    let ruth = bible.model.book_range_to_position_range(7, 7).unwrap();
    let request = SearchRequest::new("the LORD", SearchMode::AllWords, Case::Insensitive, ruth);
    let result = search(&bible, &request).unwrap();
    assert!(result.total > 0);
    assert!(result.occurs.iter().all(|p| ruth.contains(*p)));
}
