//! Chilean RUT (national ID) formatting and check-digit validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalizes free-form RUT input to `12.345.678-5` form.
///
/// Everything but digits and `K` is dropped. Input of one character or less
/// is returned as-is so partial typing is not disturbed.
#[must_use]
pub fn format_rut(input: &str) -> String {
    let clean: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'k' | 'K'))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if clean.len() <= 1 {
        return clean;
    }

    let Some(dv) = clean.chars().next_back() else {
        return clean;
    };
    let body = &clean[..clean.len() - dv.len_utf8()];
    format!("{}-{dv}", group_thousands(body))
}

fn group_thousands(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(*c);
    }
    out
}

/// Computes the modulo-11 check digit for a RUT body.
///
/// Returns `None` when the body is empty or holds anything but digits.
#[must_use]
pub fn check_digit(body: &str) -> Option<char> {
    if body.is_empty() {
        return None;
    }

    let mut sum: u32 = 0;
    let mut multiplier = 2;
    for c in body.chars().rev() {
        sum += c.to_digit(10)? * multiplier;
        multiplier = if multiplier < 7 { multiplier + 1 } else { 2 };
    }

    match 11 - (sum % 11) {
        11 => Some('0'),
        10 => Some('K'),
        d => char::from_digit(d, 10),
    }
}

/// Returns whether the RUT's check digit matches its body.
///
/// Dots and the dash are optional; the check digit is case-insensitive.
#[must_use]
pub fn validate_rut(input: &str) -> bool {
    let clean: String = input
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let Some(dv) = clean.chars().next_back() else {
        return false;
    };
    let body = &clean[..clean.len() - dv.len_utf8()];
    check_digit(body) == Some(dv)
}

/// A RUT whose check digit has been verified, stored in formatted form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rut(String);

impl Rut {
    /// Parses and formats a RUT, rejecting wrong check digits.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let formatted = format_rut(input);
        validate_rut(&formatted).then_some(Self(formatted))
    }

    /// Returns the formatted RUT.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
