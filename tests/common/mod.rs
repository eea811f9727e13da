//! Fixtures shared by the integration tests.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use lectern::bible::books::KJV_BOOK_BOUNDS;
use lectern::bible::position::PositionModel;
use lectern::constants::offsets::{PARAGRAPH_MARKER, PUNCTUATION};
use lectern::corpus::{Bible, Corpus};

/// The real book sizes, split into chapters of 30 verses.
pub fn kjv_shaped_model() -> PositionModel {
    let books: Vec<Vec<usize>> = KJV_BOOK_BOUNDS
        .windows(2)
        .map(|w| {
            let verses = w[1] - w[0];
            let mut chapters = vec![30; verses / 30];
            if verses % 30 != 0 {
                chapters.push(verses % 30);
            }
            chapters
        })
        .collect();
    PositionModel::from_chapter_lengths(&books).unwrap()
}

/// Eight books of two chapters of two verses each, Ruth last.
pub fn fixture_bible() -> Bible {
    let mut display = vec!["Selah.".to_string(); 32];
    for (i, text) in [
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
    ] {
        display[i] = text.to_string();
    }
    let stripped = display
        .iter()
        .map(|t| t.replace(PARAGRAPH_MARKER, "").chars().filter(|c| !PUNCTUATION.contains(*c)).collect())
        .collect();

    let model = PositionModel::from_chapter_lengths(&vec![vec![2, 2]; 8]).unwrap();
    Bible::new(model, Corpus::new(display, stripped).unwrap()).unwrap()
}
