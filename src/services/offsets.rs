//! Map match offsets onto display-text highlight spans.
//!
//! Whole-word matches are found in the stripped text, which has no
//! punctuation and no paragraph marker. Before a match can be highlighted in
//! the display text its offset is pushed right past every punctuation mark
//! the stripped text lost, then past every wide character, which occupies an
//! extra display column.
//!
//! All offsets are character offsets; slices past the end of a verse are
//! clamped.

use serde::{Deserialize, Serialize};

use crate::constants::offsets::{
    MAX_EXTENSION_ROUNDS, PARAGRAPH_MARKER, PARAGRAPH_MARKER_WIDTH, PUNCTUATION, WIDE_THRESHOLD,
};
use crate::constants::search::APOSTROPHE;

/// Highlight span in display columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySpan {
    /// First highlighted column.
    pub start: usize,
    /// Number of highlighted columns.
    pub len: usize,
}

/// Whether a character takes an extra display column.
pub fn is_wide(c: char) -> bool {
    u32::from(c) > WIDE_THRESHOLD && c != APOSTROPHE
}

fn chars_between(text: &str, start: usize, end: usize) -> impl Iterator<Item = char> + '_ {
    text.chars().skip(start).take(end.saturating_sub(start))
}

/// Punctuation marks in the character range `start..end`.
pub fn punctuation_count(text: &str, start: usize, end: usize) -> usize {
    chars_between(text, start, end).filter(|c| PUNCTUATION.contains(*c)).count()
}

fn wide_count(text: &str, start: usize, end: usize) -> usize {
    chars_between(text, start, end).filter(|c| is_wide(*c)).count()
}

/// Punctuation before `end`, extending the window by each round's count
/// until a round finds none.
pub fn repeat_find(display: &str, start: usize, end: usize) -> usize {
    let mut start = start;
    let mut sum = 0;
    for _ in 0..=MAX_EXTENSION_ROUNDS {
        let found = punctuation_count(display, start, end + sum);
        sum += found;
        start = end + sum - found;
        if found == 0 {
            break;
        }
    }
    sum
}

/// Punctuation inside a match window, growing the window past each mark found.
pub fn repeat_find_keyinc(display: &str, start: usize, end: usize) -> usize {
    let (mut start, mut end) = (start, end);
    let mut sum = 0;
    loop {
        let found = punctuation_count(display, start, end);
        sum += found;
        if found == 0 {
            return sum;
        }
        start = end;
        end += found;
    }
}

/// Map a span found in the stripped text at `offset` onto the display text.
pub fn map_word_span(display: &str, offset: usize, key_len: usize) -> DisplaySpan {
    let offset = if display.contains(PARAGRAPH_MARKER) {
        offset + PARAGRAPH_MARKER_WIDTH
    } else {
        offset
    };
    let add = repeat_find(display, 0, offset);
    let start = offset + add;
    let leading = wide_count(display, 0, start);

    let inside = repeat_find_keyinc(display, start, start + key_len);
    let end = offset + key_len + add;
    let length = display.chars().count();
    let trailing = if start > length || end > length {
        0
    } else {
        wide_count(display, start, end + inside)
    };

    DisplaySpan { start: start + leading, len: key_len + trailing + inside }
}

/// Map a span found directly in the display text; only wide characters shift it.
pub fn map_raw_span(display: &str, start: usize, len: usize) -> DisplaySpan {
    let leading = wide_count(display, 0, start);
    let end = start + len;
    let length = display.chars().count();
    let trailing = if start > length || end > length {
        0
    } else {
        wide_count(display, start, end)
    };
    DisplaySpan { start: start + leading, len: len + trailing }
}
