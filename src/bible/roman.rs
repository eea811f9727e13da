//! Classical Roman numerals.
//!
//! Only strictly formed numerals up to 4999 are accepted (`iv`, never `iiii`),
//! in either case. The empty string is not a numeral.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Strict classical numeral, case-insensitive.
#[allow(clippy::expect_used)]
static RE_ROMAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^M{0,4}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$")
        .expect("valid regex: RE_ROMAN")
});

/// Whole alphanumeric token made only of Roman digits.
#[allow(clippy::expect_used)]
static RE_ROMAN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[ivxlcdm]+\b").expect("valid regex: RE_ROMAN_TOKEN")
});

/// Whether `s` is a valid, non-empty Roman numeral.
pub fn is_roman(s: &str) -> bool {
    !s.is_empty() && RE_ROMAN.is_match(s)
}

const fn digit_value(c: char) -> Option<u32> {
    match c.to_ascii_lowercase() {
        'i' => Some(1),
        'v' => Some(5),
        'x' => Some(10),
        'l' => Some(50),
        'c' => Some(100),
        'd' => Some(500),
        'm' => Some(1000),
        _ => None,
    }
}

/// Decimal value of a valid numeral.
pub fn from_roman(s: &str) -> Option<u32> {
    if !is_roman(s) {
        return None;
    }
    let digits = s.chars().map(digit_value).collect::<Option<Vec<_>>>()?;
    let mut total = 0;
    for (i, &value) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(&next) if next > value => total -= i64::from(value),
            _ => total += i64::from(value),
        }
    }
    u32::try_from(total).ok()
}

/// Replace every whole token that is a valid numeral by its decimal value.
///
/// Invalid runs such as `iiii` or `mim` are left alone.
pub fn convert_numerals(text: &str) -> Cow<'_, str> {
    RE_ROMAN_TOKEN.replace_all(text, |caps: &regex::Captures<'_>| {
        let token = &caps[0];
        from_roman(token).map_or_else(|| token.to_string(), |n| n.to_string())
    })
}
