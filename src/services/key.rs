//! Search key normalisation.
//!
//! The stripped corpus spells archaic words with `æ` ligatures, has no
//! mathematical italics and uses `’` for apostrophes. Keys are brought into
//! the same form before matching.

use crate::constants::search::{APOSTROPHE, KEY_STRIP_CHARS};
use crate::corpus::Case;

/// Digraphs written with a ligature in the corpus; only the first match is replaced.
const LIGATURES: [(&str, &str); 10] = [
    ("aea", "æa"),
    ("aeu", "æu"),
    ("aes", "æs"),
    ("aet", "æt"),
    ("aene", "æne"),
    ("aeno", "æno"),
    ("AEno", "Æno"),
    ("AEne", "Æne"),
    ("Aeno", "Æno"),
    ("Aene", "Æne"),
];

/// Mathematical italic capitals A..Y.
const ITALIC_CAPITALS: std::ops::RangeInclusive<u32> = 0x1D434..=0x1D44C;
/// Mathematical italic smalls a..y (the italic small h lives elsewhere).
const ITALIC_SMALLS: std::ops::RangeInclusive<u32> = 0x1D44E..=0x1D466;
/// Planck constant, used for the italic small h.
const ITALIC_SMALL_H: u32 = 0x1D4BD;

/// Replace the first archaic digraph found, in table order.
pub fn replace_ligature(key: &str) -> String {
    LIGATURES
        .iter()
        .find(|(plain, _)| key.contains(plain))
        .map_or_else(|| key.to_string(), |(plain, ligature)| key.replacen(plain, ligature, 1))
}

fn plain_char(c: char) -> char {
    let code = u32::from(c);
    let mapped = if ITALIC_CAPITALS.contains(&code) {
        char::from_u32(code - ITALIC_CAPITALS.start() + u32::from('A'))
    } else if ITALIC_SMALLS.contains(&code) {
        char::from_u32(code - ITALIC_SMALLS.start() + u32::from('a'))
    } else if code == ITALIC_SMALL_H {
        Some('h')
    } else if c == '\'' {
        Some(APOSTROPHE)
    } else {
        None
    };
    mapped.unwrap_or(c)
}

/// Map italics and apostrophes to plain text; word keys also lose hyphens.
pub fn plain_characters(key: &str, whole_words: bool) -> String {
    key.chars()
        .filter(|&c| !(whole_words && c == '-'))
        .map(plain_char)
        .collect()
}

/// Strip separator punctuation from each word and drop empty words.
pub fn split_strip(key: &str) -> Vec<String> {
    let strip: Vec<char> = KEY_STRIP_CHARS.chars().collect();
    key.split(' ')
        .map(|word| word.trim_matches(strip.as_slice()))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole-word pattern for a word or phrase; a trailing possessive `s’`
/// also matches `s’s` and `’s` forms.
pub fn whole_word_pattern(word: &str) -> String {
    match word.strip_suffix("s’") {
        Some(stem) => format!(r"\b{}[s’][s’]", regex::escape(stem)),
        None => format!(r"\b{}\b", regex::escape(word)),
    }
}

/// A key ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKey {
    /// The key as matched and reported.
    pub text: String,
    /// Its words, for whole-word modes.
    pub words: Vec<String>,
}

impl NormalizedKey {
    /// Normalise a key for literal or pattern matching.
    pub fn literal(raw: &str, case: Case) -> Self {
        let text = plain_characters(&replace_ligature(raw), false);
        let text = match case {
            Case::Sensitive => text,
            Case::Insensitive => text.to_lowercase(),
        };
        Self { words: Vec::new(), text }
    }

    /// Normalise a key for whole-word matching.
    pub fn whole_words(raw: &str, case: Case) -> Self {
        let text = plain_characters(&replace_ligature(raw), true);
        let text = match case {
            Case::Sensitive => text,
            Case::Insensitive => text.to_lowercase(),
        };
        let words = split_strip(&text);
        Self { text: words.join(" "), words }
    }

    /// Whether nothing is left to search for.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_ligature_only() {
        assert_eq!(replace_ligature("Caesar"), "Cæsar");
        assert_eq!(replace_ligature("Aeneas aes"), "Aeneas æs");
        assert_eq!(replace_ligature("plain"), "plain");
    }

    #[test]
    fn test_italics_and_apostrophes() {
        let italic_lord = "\u{1D43F}\u{1D442}\u{1D445}\u{1D437}";
        assert_eq!(plain_characters(italic_lord, true), "LORD");
        assert_eq!(plain_characters("\u{1D44E}\u{1D4BD}", true), "ah");
        assert_eq!(plain_characters("Boaz's", true), "Boaz’s");
    }

    #[test]
    fn test_word_keys_drop_hyphens_and_punctuation() {
        let key = NormalizedKey::whole_words("  Beer-sheba, (the) LORD! ", Case::Insensitive);
        assert_eq!(key.words, ["beersheba", "the", "lord"]);
        assert_eq!(key.text, "beersheba the lord");

        let literal = NormalizedKey::literal("Beer-sheba", Case::Sensitive);
        assert_eq!(literal.text, "Beer-sheba");
        assert!(NormalizedKey::whole_words(" ;; ", Case::Sensitive).is_empty());
    }

    #[test]
    fn test_possessive_pattern() {
        assert_eq!(whole_word_pattern("lord"), r"\blord\b");
        assert_eq!(whole_word_pattern("brethrens’"), r"\bbrethren[s’][s’]");
    }
}
