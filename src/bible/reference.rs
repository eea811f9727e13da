//! Free-form reference resolution.
//!
//! Turns text such as `"Gen 2:3"`, `"iiKi.4"`, `"genesis ii.3"`, `"23.7"` or
//! `"-2"` into a [`Position`]. The pipeline runs in a fixed order:
//!
//! 1. [`sanitize`] drops junk characters and a trailing translation label.
//! 2. [`clean_prefix`] lowercases, strips a `chap` prefix and glues book names.
//! 3. [`repair_adjacency`] splits a book glued to a Roman chapter (`genesisx`).
//! 4. Roman numerals are converted, except where the whole text is a
//!    one-letter book or the leading token is itself a book abbreviation.
//! 5. The shape is validated and missing fields are filled from context.
//! 6. Bare integers move within the current chapter; bare decimals are
//!    `chapter.verse` in the current book.
//! 7. The fields are looked up in the [`PositionModel`].

use std::sync::LazyLock;

use regex::Regex;

use super::books::{
    book_key, expanded_initial, is_book, is_single_chapter, lookup_book, ADJACENCY_EXCEPTIONS,
    ROMAN_LETTER_BOOKS,
};
use super::position::{Locus, Position, PositionModel};
use super::roman::{convert_numerals, from_roman, is_roman};
use crate::error::{Field, ReferenceError};

/// Characters a typed reference may contain besides ASCII letters and digits.
const ALLOWED_PUNCTUATION: &str = "():,’;-?[].!<> ";

/// Trailing translation label users often paste along with a reference.
const TRANSLATION_SUFFIX: &str = " KJV";

/// Separators between reference fields.
#[allow(clippy::expect_used)]
static RE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ .:]+").expect("valid regex: RE_SEPARATORS"));

/// Letter runs and digit runs inside a mixed token.
#[allow(clippy::expect_used)]
static RE_LETTERS_OR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+|\d+").expect("valid regex: RE_LETTERS_OR_DIGITS"));

/// Fully formatted `book.chapter.verse[,more]`.
#[allow(clippy::expect_used)]
static RE_PREFORMATTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-4]?[a-z]+\.\d+\.\d+(,\d+)*$").expect("valid regex: RE_PREFORMATTED")
});

/// `[book][chapter][.verse]`, every part optional.
#[allow(clippy::expect_used)]
static RE_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([1-4]?[a-z]+)?\.?(\d+)?(?:[.:](\d+))?$").expect("valid regex: RE_LOOSE")
});

/// Anything that reads as a floating point number.
#[allow(clippy::expect_used)]
static RE_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\b[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][-+]?[0-9]+\b)?$")
        .expect("valid regex: RE_FLOAT")
});

/// An optionally negative integer.
#[allow(clippy::expect_used)]
static RE_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("valid regex: RE_INTEGER"));

/// Where the reader is, used to fill in whatever a reference leaves out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceContext {
    /// Book assumed when the reference names none (zero-based).
    pub book: usize,
    /// Chapter assumed when the reference names none (zero-based).
    pub chapter: usize,
    /// Current position; bare numbers and decimals are relative to it.
    pub position: Position,
}

impl ReferenceContext {
    /// Context taken entirely from the current position.
    pub fn at(model: &PositionModel, position: Position) -> Self {
        let locus = model.position_to_locus(position);
        Self { book: locus.book, chapter: locus.chapter, position }
    }
}

/// Resolve a reference typed by the user.
pub fn resolve(
    model: &PositionModel,
    input: &str,
    context: &ReferenceContext,
) -> Result<Position, ReferenceError> {
    let sanitized = sanitize(input)?;
    let cleaned = clean_prefix(&sanitized);
    let repaired = repair_adjacency(&cleaned);

    let text = if ROMAN_LETTER_BOOKS.contains(&repaired.as_str()) {
        repaired
    } else {
        join_fields(&convert_after_book(&repaired))
    };

    let text = fill_fields(text, context)?;
    tracing::debug!("Resolving {input:?} as {text:?}");

    if let Some(offset) = parse_offset(&text) {
        return resolve_offset(model, offset, context.position, &text);
    }

    let text = if is_float(&text) {
        let book = model.position_to_locus(context.position).book;
        format!("{} {text}", book_key(book).unwrap_or_default())
    } else {
        text
    };

    resolve_fields(model, &split_reference(&text), &text)
}

/// Keep only characters that can belong to a reference and trim the ends.
///
/// An optionally negative integer is returned untouched.
pub fn sanitize(input: &str) -> Result<String, ReferenceError> {
    let unsigned = input.trim_start_matches('-');
    if !unsigned.is_empty() && unsigned.chars().all(|c| c.is_ascii_digit()) {
        return Ok(input.to_string());
    }

    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(*c))
        .collect();

    let Some(first) = kept.find(|c: char| c.is_ascii_alphanumeric()) else {
        return Err(ReferenceError::InvalidFormat { input: input.to_string() });
    };
    let last = kept.rfind(|c: char| c.is_ascii_alphanumeric()).unwrap_or(first);
    let trimmed = squeeze(&squeeze(&kept[first..=last], '.'), ':');

    if let Some(reference) = trimmed.strip_suffix(TRANSLATION_SUFFIX) {
        return Ok(reference.to_string());
    }
    Ok(trimmed)
}

/// Collapse runs of `ch` to a single `ch`.
fn squeeze(text: &str, ch: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ch && out.ends_with(ch) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Lowercase, normalise separators and glue split book names.
///
/// `"2 Corinthians 5:17"` becomes `"2corinthians 5.17"`, `"Chap2:3"`
/// becomes `"2.3"` and `"Zechariah 1:12,13"` becomes `"zechariah 1.12"`.
pub fn clean_prefix(text: &str) -> String {
    let text = text.to_lowercase().replace(':', ".");

    if let Some(rest) = text.strip_prefix("chapter").or_else(|| text.strip_prefix("chap")) {
        return rest.trim_matches(|c| c == '.' || c == ' ').to_string();
    }

    // Numbered books: "2 kings" -> "2kings".
    let head: String = text.chars().take(3).filter(|c| *c != ' ').collect();
    let text: String = head + &text.chars().skip(3).collect::<String>();

    // Spaces between two letters: "song of solomon" -> "songofsolomon".
    let chars: Vec<char> = text.chars().collect();
    let mut glued = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let between_letters = c == ' '
            && i > 0
            && chars[i - 1].is_ascii_lowercase()
            && chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
        if !between_letters {
            glued.push(c);
        }
    }

    if let Some((first, _)) = glued.split_once(',') {
        return first.to_string();
    }
    glued
}

/// Split a reference into at most three fields: book, chapter, verse.
///
/// A leading token that is a book is kept whole. Other tokens are split into
/// letter and digit runs, and a leading book number is glued back onto the
/// name that follows it (`"1 john3"` gives `["1john", "3"]`).
pub fn split_reference(text: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for (i, piece) in RE_SEPARATORS.split(text).enumerate() {
        if i == 0 && is_book(piece) {
            parts.push(piece.to_string());
        } else {
            parts.extend(RE_LETTERS_OR_DIGITS.find_iter(piece).map(|m| m.as_str().to_string()));
        }
    }

    let leading_number = parts.first().and_then(|p| p.parse::<u64>().ok()).is_some_and(|n| n != 0);
    if parts.len() > 1 && leading_number {
        let number = parts.remove(0);
        parts[0] = format!("{number}{}", parts[0]);
    }

    parts.truncate(3);
    parts
}

/// Re-split a book name glued to a Roman numeral chapter.
///
/// `"genesisx.iv"` becomes `"genesis x.iv"` and `"dii"` becomes
/// `"deuteronomy ii"`. Text that cannot be split this way is returned as is.
pub fn repair_adjacency(text: &str) -> String {
    let mut text = text.to_string();
    let mut parts = split_reference(&text);
    let Some(first) = parts.first() else {
        return text;
    };

    // A Roman numeral led by one of the ambiguous initials names a book:
    // "civ" is Colossians iv, not 104.
    if !is_book(first) {
        let mut chars = first.chars();
        let expansion = chars.next().and_then(expanded_initial);
        if let Some(name) = expansion.filter(|_| is_roman(chars.as_str())) {
            let rest = text.char_indices().nth(1).map_or("", |(i, _)| &text[i..]);
            text = format!("{name}{rest}");
            parts = split_reference(&text);
        }
    }

    let Some(token) = parts.first() else {
        return text;
    };
    let lone_exception = parts.len() == 1 && ADJACENCY_EXCEPTIONS.contains(&token.as_str());
    if (is_book(token) || is_roman(token)) && !lone_exception {
        return text;
    }

    // Tokens here are ASCII letter or digit runs, so byte slicing is safe.
    let len = token.len();
    let mut numeral_start = len;
    for start in (1..len).rev() {
        if is_roman(&token[start..]) {
            numeral_start = start;
        } else {
            break;
        }
    }
    let Some(book_end) = (1..len).rev().find(|&end| is_book(&token[..end])) else {
        return text;
    };
    if book_end < numeral_start {
        return text;
    }

    // Either the book and numeral tile the token exactly, or they overlap and
    // the book wins, leaving the rest of the numeral as the chapter.
    let book = &token[..book_end];
    let chapter = &token[book_end..];
    let repaired = match parts.get(1) {
        Some(verse) => format!("{book} {chapter}.{verse}"),
        None => format!("{book} {chapter}"),
    };
    tracing::debug!("Split {token:?} into {repaired:?}");
    repaired
}

/// Convert Roman numerals, leaving a leading book abbreviation alone.
///
/// `"mi"` is Micah, not 1001, and `"m i"` is Micah 1.
fn convert_after_book(text: &str) -> String {
    let end = text.find([' ', '.']).unwrap_or(text.len());
    let (head, tail) = text.split_at(end);
    if is_book(head) {
        format!("{head}{}", convert_numerals(tail))
    } else {
        convert_numerals(text).into_owned()
    }
}

/// Drop spaces between fields; a space between two numbers becomes a period.
fn join_fields(text: &str) -> String {
    let mut joined = String::with_capacity(text.len());
    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let numbers_meet = joined.ends_with(|c: char| c.is_ascii_digit())
            && word.starts_with(|c: char| c.is_ascii_digit());
        if numbers_meet {
            joined.push('.');
        }
        joined.push_str(word);
    }
    joined
}

fn is_float(text: &str) -> bool {
    RE_FLOAT.is_match(text)
}

/// Validate the shape and rewrite loose forms as `book.chapter.verse`.
fn fill_fields(text: String, context: &ReferenceContext) -> Result<String, ReferenceError> {
    if RE_PREFORMATTED.is_match(&text) || is_float(&text) {
        return Ok(text);
    }

    let invalid = || ReferenceError::InvalidFormat { input: text.clone() };
    let caps = RE_LOOSE.captures(&text).ok_or_else(invalid)?;
    let (book, chapter, verse) = (caps.get(1), caps.get(2), caps.get(3));
    if book.is_none() && chapter.is_none() && verse.is_none() {
        return Err(invalid());
    }

    let book = book.map_or_else(
        || book_key(context.book).unwrap_or_default(),
        |m| m.as_str(),
    );
    let mut chapter = match chapter {
        Some(m) => m
            .as_str()
            .parse::<usize>()
            .map_err(|_| ReferenceError::InvalidChapter { token: m.as_str().to_string() })?,
        None => context.chapter + 1,
    };
    let mut verse = verse.map_or_else(|| "1".to_string(), |m| m.as_str().to_string());

    // "jude 3" is Jude 1:3.
    if lookup_book(book).is_some_and(is_single_chapter) && chapter != 1 {
        verse = chapter.to_string();
        chapter = 1;
    }

    Ok(format!("{book}.{chapter}.{verse}"))
}

fn parse_offset(text: &str) -> Option<i64> {
    if RE_INTEGER.is_match(text) {
        text.parse().ok()
    } else {
        None
    }
}

/// Move within the current chapter: `n` is verse n, `0` stays, `-n` goes back n.
fn resolve_offset(
    model: &PositionModel,
    offset: i64,
    current: Position,
    text: &str,
) -> Result<Position, ReferenceError> {
    let here = model.position_to_locus(current);
    let chapter_start = current.index() - here.verse;
    let distance = usize::try_from(offset.unsigned_abs()).ok();

    let target = match offset {
        0 => Some(current.index()),
        n if n > 0 => distance.and_then(|d| chapter_start.checked_add(d - 1)),
        _ => distance.and_then(|d| current.index().checked_sub(d)),
    }
    .map(Position::new)
    .filter(|&p| {
        let there = model.position_to_locus(p);
        model.contains(p) && there.book == here.book && there.chapter == here.chapter
    });

    target.ok_or_else(|| {
        tracing::warn!("Verse offset {offset} leaves the current chapter");
        ReferenceError::OutOfRange {
            reference: text.to_string(),
            field: Field::Verse,
            fallback: current,
        }
    })
}

fn parse_number(token: &str) -> Option<i64> {
    from_roman(token).map(i64::from).or_else(|| token.parse().ok())
}

/// Look up split `[book, chapter, verse]` fields.
fn resolve_fields(
    model: &PositionModel,
    bits: &[String],
    text: &str,
) -> Result<Position, ReferenceError> {
    let token = bits
        .first()
        .ok_or_else(|| ReferenceError::InvalidFormat { input: text.to_string() })?;
    let book = lookup_book(token).ok_or_else(|| ReferenceError::UnknownBook { token: token.clone() })?;

    let chapter = match bits.get(1) {
        Some(t) => parse_number(t).ok_or_else(|| ReferenceError::InvalidChapter { token: t.clone() })?,
        None => 1,
    };
    let verse = match bits.get(2) {
        Some(t) => parse_number(t).ok_or_else(|| ReferenceError::InvalidVerse { token: t.clone() })?,
        None => 1,
    };

    let out_of_range = |field| {
        tracing::warn!("The {field} is out of bounds in {text:?}");
        ReferenceError::OutOfRange { reference: text.to_string(), field, fallback: Position::new(0) }
    };

    let chapter = chapter
        .checked_sub(1)
        .and_then(|c| usize::try_from(c).ok())
        .ok_or_else(|| out_of_range(Field::Chapter))?;
    let verse = verse
        .checked_sub(1)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| out_of_range(Field::Verse))?;

    model.locus_to_position(Locus::new(book, chapter, verse)).ok_or_else(|| {
        if chapter >= model.chapter_count(book) {
            out_of_range(Field::Chapter)
        } else {
            out_of_range(Field::Verse)
        }
    })
}
