//! New wound form state.

use chrono::{NaiveDate, TimeDelta};

use crate::domain::entities::{PatientId, UserId, WoundOrigin};
use crate::domain::errors::ValidationErrors;
use crate::domain::ports::NewWound;

/// Input collected on the add-wound screen.
#[derive(Debug, Clone)]
pub struct WoundForm {
    patient: PatientId,
    location: String,
    origin: Option<WoundOrigin>,
    origin_date: NaiveDate,
    errors: ValidationErrors,
}

impl WoundForm {
    /// Creates an empty form whose origin date defaults to `today`.
    #[must_use]
    pub fn new(patient: PatientId, today: NaiveDate) -> Self {
        Self {
            patient,
            location: String::new(),
            origin: None,
            origin_date: today,
            errors: ValidationErrors::new(),
        }
    }

    #[must_use]
    pub const fn patient(&self) -> PatientId {
        self.patient
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub const fn origin(&self) -> Option<&WoundOrigin> {
        self.origin.as_ref()
    }

    #[must_use]
    pub const fn origin_date(&self) -> NaiveDate {
        self.origin_date
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Shows a message from the backend as the form-level error.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.errors.set_form(message);
    }

    pub fn set_location(&mut self, text: &str) {
        self.location = text.to_string();
    }

    /// Steps through the origin categories, wrapping around.
    pub fn cycle_origin(&mut self, forward: bool) {
        let all = &WoundOrigin::ALL;
        let position = self
            .origin
            .as_ref()
            .and_then(|current| all.iter().position(|o| o == current));
        let index = match (position, forward) {
            (None, true) => 0,
            (None, false) => all.len() - 1,
            (Some(i), true) => (i + 1) % all.len(),
            (Some(i), false) => (i + all.len() - 1) % all.len(),
        };
        self.origin = Some(all[index].clone());
    }

    pub fn shift_origin_date(&mut self, days: i64) {
        if let Some(date) = self.origin_date.checked_add_signed(TimeDelta::days(days)) {
            self.origin_date = date;
        }
    }

    /// Requires a location and an origin.
    ///
    /// # Errors
    /// Returns inline errors for every missing field.
    pub fn submit(&mut self, author: UserId) -> Result<NewWound, ValidationErrors> {
        self.errors.clear();
        if self.location.trim().is_empty() {
            self.errors.insert("wound_location", "Wound location is required.");
        }
        let Some(origin) = self.origin.clone() else {
            self.errors.insert("wound_origin", "Wound origin is required.");
            return Err(self.errors.clone());
        };
        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }

        Ok(NewWound {
            patient: self.patient,
            location: self.location.trim().to_string(),
            origin,
            origin_date: self.origin_date,
            created_by: author,
            updated_by: author,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let mut form = WoundForm::new(PatientId(4), today());
        let errors = form.submit(UserId(7)).unwrap_err();
        assert!(errors.has("wound_location"));
        assert!(errors.has("wound_origin"));
    }

    #[test]
    fn test_origin_cycles_through_catalogue() {
        let mut form = WoundForm::new(PatientId(4), today());
        form.cycle_origin(true);
        assert_eq!(form.origin(), Some(&WoundOrigin::ALL[0]));
        form.cycle_origin(false);
        form.cycle_origin(false);
        assert_eq!(form.origin(), WoundOrigin::ALL.last());
    }

    #[test]
    fn test_submit_defaults_origin_date_to_today() {
        let mut form = WoundForm::new(PatientId(4), today());
        form.set_location("  Talón derecho ");
        form.cycle_origin(true);

        let wound = form.submit(UserId(7)).unwrap();

        assert_eq!(wound.location, "Talón derecho");
        assert_eq!(wound.origin_date, today());
        assert_eq!(wound.patient, PatientId(4));

        form.shift_origin_date(-2);
        assert_eq!(form.origin_date(), NaiveDate::from_ymd_opt(2024, 5, 30).unwrap());
    }
}
