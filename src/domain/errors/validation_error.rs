//! Client-side validation errors.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Message for a missing mandatory field.
pub const REQUIRED: &str = "Required field.";
/// Message for a field that must hold a number.
pub const NOT_NUMERIC: &str = "Must be numeric.";

/// Per-field validation failures collected before submission.
///
/// Field errors are shown inline next to their input. A form-level message
/// covers rules that span several fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
    form: Option<String>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set with a single field error.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Records an error for a field, replacing any previous one.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    /// Clears the error of a single field.
    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    /// Sets the form-level message.
    pub fn set_form(&mut self, message: impl Into<String>) {
        self.form = Some(message.into());
    }

    /// Clears the form-level message.
    pub fn clear_form(&mut self) {
        self.form = None;
    }

    /// Clears everything.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.form = None;
    }

    /// Returns the error for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns the form-level message.
    #[must_use]
    pub fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }

    /// Returns whether a field has an error.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns whether no error is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_none()
    }

    /// Iterates over field errors in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Converts into a `Result`, failing when any error is recorded.
    ///
    /// # Errors
    /// Returns `self` when it is not empty.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(form) = &self.form {
            return write!(f, "{form}");
        }
        match self.fields.iter().next() {
            Some((field, message)) if self.fields.len() == 1 => write!(f, "{field}: {message}"),
            Some(_) => write!(f, "{} fields are invalid", self.fields.len()),
            None => write!(f, "no validation errors"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_field_error_round_trip() {
        let mut errors = ValidationErrors::single("width", REQUIRED);
        assert_eq!(errors.get("width"), Some(REQUIRED));
        assert_eq!(errors.to_string(), "width: Required field.");

        errors.clear_field("width");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_form_message_takes_precedence_in_display() {
        let mut errors = ValidationErrors::single("slough", NOT_NUMERIC);
        errors.set_form("Tissue percentages cannot exceed 100%.");
        assert_eq!(errors.to_string(), "Tissue percentages cannot exceed 100%.");
        assert!(errors.into_result().is_err());
    }
}
