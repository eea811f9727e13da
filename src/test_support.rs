//! Shared fixtures for unit tests.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use crate::bible::books::KJV_BOOK_BOUNDS;
use crate::bible::position::PositionModel;
use crate::constants::offsets::{PARAGRAPH_MARKER, PUNCTUATION};
use crate::corpus::{Bible, Corpus};

/// Verses per chapter in the synthetic full-size model.
const SYNTHETIC_CHAPTER: usize = 30;

/// A model with the real book sizes, every chapter 30 verses long except
/// the last of each book.
pub fn kjv_shaped_model() -> PositionModel {
    let books: Vec<Vec<usize>> = KJV_BOOK_BOUNDS
        .windows(2)
        .map(|w| {
            let verses = w[1] - w[0];
            let mut chapters = vec![SYNTHETIC_CHAPTER; verses / SYNTHETIC_CHAPTER];
            if verses % SYNTHETIC_CHAPTER != 0 {
                chapters.push(verses % SYNTHETIC_CHAPTER);
            }
            chapters
        })
        .collect();
    PositionModel::from_chapter_lengths(&books).unwrap()
}

/// Strip a display verse the way the shipped stripped text is produced.
pub fn strip(display: &str) -> String {
    display
        .replace(PARAGRAPH_MARKER, "")
        .chars()
        .filter(|c| !PUNCTUATION.contains(*c))
        .collect()
}

/// Eight books of two chapters of two verses; Ruth is the last book.
pub fn fixture_bible() -> Bible {
    let mut display = vec!["Selah.".to_string(); 32];
    let verses = [
        (0, "In the beginning God created the heaven and the earth."),
        (1, "And the earth was without form, and void; and darkness was upon the face of the deep."),
        (2, "¶ Thus the heavens and the earth were finished, and all the host of them."),
        (3, "And the LORD God formed man of the dust of the ground."),
        (4, "Now these are the names of the children of Israel."),
        (5, "And the LORD said unto Moses, Go in unto Pharaoh."),
        (28, "Now it came to pass in the days when the judges ruled."),
        (29, "The LORD be with you. And they answered him, The LORD bless thee."),
        (30, "And Boaz said, Blessed be he of the LORD."),
        (31, "And she said, Let me glean in Boaz’s field."),
    ];
    for (i, text) in verses {
        display[i] = text.to_string();
    }
    let stripped = display.iter().map(|t| strip(t)).collect();

    let model = PositionModel::from_chapter_lengths(&vec![vec![2, 2]; 8]).unwrap();
    Bible::new(model, Corpus::new(display, stripped).unwrap()).unwrap()
}
