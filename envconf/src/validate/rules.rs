//! Constraint primitives used by the struct validator.

use crate::reflect::ValueRef;

/// The only named pattern with a real check.
pub const ALPHANUMERIC: &str = "alphanumeric";

/// Parses a leading integer leniently.
///
/// Reads an optional `-` followed by as many decimal digits as are present,
/// stopping at the first other character. Returns `default` if there are
/// no digits or the number does not fit in an `i64`.
///
/// # Examples
///
/// ```
/// use envconf::validate::rules::parse_int;
///
/// assert_eq!(parse_int("123.45", 0), 123);
/// assert_eq!(parse_int("-456", 0), -456);
/// assert_eq!(parse_int("abc", 10), 10);
/// assert_eq!(parse_int("", 5), 5);
/// ```
#[must_use]
pub fn parse_int(text: &str, default: i64) -> i64 {
    let digits_start = usize::from(text.starts_with('-'));
    let digits_len = text[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits_len == 0 {
        return default;
    }

    text[..digits_start + digits_len]
        .parse()
        .unwrap_or(default)
}

/// Returns true if every character is an ASCII letter or digit.
///
/// The empty string is alphanumeric.
#[must_use]
pub fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Checks `s` against a named pattern.
///
/// Unknown pattern names always match.
#[must_use]
pub fn matches_pattern(s: &str, pattern: &str) -> bool {
    match pattern {
        ALPHANUMERIC => is_alphanumeric(s),
        _ => true,
    }
}

/// Whether a value counts as missing for `required`.
///
/// Empty strings, unset optionals and zero-length lists or collections are
/// empty. Numbers, booleans and records never are.
#[must_use]
pub fn is_empty(value: &ValueRef<'_>) -> bool {
    match value {
        ValueRef::Str(s) => s.is_empty(),
        ValueRef::Pointer(ptr) => ptr.target().is_none(),
        ValueRef::List(items) => items.is_empty(),
        ValueRef::Collection(len) => *len == 0,
        ValueRef::Int(_) | ValueRef::Bool(_) | ValueRef::Record(_) | ValueRef::Unsupported => {
            false
        }
    }
}

/// Length in characters.
#[must_use]
pub fn length(s: &str) -> i64 {
    i64::try_from(s.chars().count()).unwrap_or(i64::MAX)
}
