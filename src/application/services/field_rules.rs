//! Shared per-field input rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::errors::ValidationErrors;
use crate::domain::errors::validation_error::{NOT_NUMERIC, REQUIRED};

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid numeric regex"));

/// Unsigned decimal: digits with an optional fractional part.
#[must_use]
pub fn is_numeric(value: &str) -> bool {
    NUMERIC_RE.is_match(value)
}

/// Parses a value, treating anything unparsable as zero.
#[must_use]
pub fn parse_or_zero(value: &str) -> f64 {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Uppercases the first letter of every space-separated word, lowercases the rest.
#[must_use]
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks one field and records or clears its error. Returns whether it passed.
///
/// Numeric fields report the numeric message even when empty.
pub fn check_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    numeric: bool,
) -> bool {
    if numeric && !is_numeric(value) {
        errors.insert(field, NOT_NUMERIC);
        false
    } else if value.trim().is_empty() {
        errors.insert(field, REQUIRED);
        false
    } else {
        errors.clear_field(field);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("12", true)]
    #[test_case("0.5", true)]
    #[test_case("10.25", true)]
    #[test_case("", false)]
    #[test_case(".5", false)]
    #[test_case("5.", false)]
    #[test_case("-3", false)]
    #[test_case("1e3", false)]
    #[test_case(" 4", false)]
    fn test_is_numeric(input: &str, expected: bool) {
        assert_eq!(is_numeric(input), expected);
    }

    #[test_case("juan pablo", "Juan Pablo")]
    #[test_case("MARÍA  josé", "María  José")]
    #[test_case("", "")]
    fn test_capitalize_words(input: &str, expected: &str) {
        assert_eq!(capitalize_words(input), expected);
    }

    #[test]
    fn test_parse_or_zero() {
        assert!((parse_or_zero("abc") - 0.0).abs() < f64::EPSILON);
        assert!((parse_or_zero("40.5") - 40.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_check_field_messages() {
        let mut errors = ValidationErrors::new();
        assert!(!check_field(&mut errors, "width", "", true));
        assert_eq!(errors.get("width"), Some(NOT_NUMERIC));
        assert!(!check_field(&mut errors, "edema", " ", false));
        assert_eq!(errors.get("edema"), Some(REQUIRED));
        assert!(check_field(&mut errors, "width", "3", true));
        assert!(!errors.has("width"));
    }
}
