//! New patient form state.

use chrono::NaiveDate;

use super::field_rules::capitalize_words;
use crate::domain::catalog;
use crate::domain::entities::UserId;
use crate::domain::errors::ValidationErrors;
use crate::domain::ports::NewPatient;
use crate::domain::services::{format_rut, validate_rut};

pub const INVALID_RUT: &str = "Invalid RUT.";

/// Which condition checklist an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionList {
    ChronicDiseases,
    Predispositions,
}

impl ConditionList {
    #[must_use]
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            Self::ChronicDiseases => catalog::CHRONIC_DISEASES,
            Self::Predispositions => catalog::PREDISPOSITIONS,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ChronicDiseases => "Chronic diseases",
            Self::Predispositions => "Predispositions",
        }
    }
}

/// Input collected on the new patient screen.
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    first_name: String,
    last_name: String,
    rut: String,
    birth_date: String,
    chronic_diseases: Vec<String>,
    predispositions: Vec<String>,
    errors: ValidationErrors,
}

impl PatientForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn rut(&self) -> &str {
        &self.rut
    }

    #[must_use]
    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Shows a message from the backend as the form-level error.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.errors.set_form(message);
    }

    pub fn set_first_name(&mut self, text: &str) {
        self.first_name = capitalize_words(text);
    }

    pub fn set_last_name(&mut self, text: &str) {
        self.last_name = capitalize_words(text);
    }

    /// Stores the formatted RUT and updates its live error.
    pub fn set_rut(&mut self, text: &str) {
        self.rut = format_rut(text);
        if validate_rut(&self.rut) {
            self.errors.clear_field("rut");
        } else {
            self.errors.insert("rut", INVALID_RUT);
        }
    }

    pub fn set_birth_date(&mut self, text: &str) {
        self.birth_date = text.to_string();
    }

    #[must_use]
    pub fn selected(&self, list: ConditionList) -> &[String] {
        match list {
            ConditionList::ChronicDiseases => &self.chronic_diseases,
            ConditionList::Predispositions => &self.predispositions,
        }
    }

    #[must_use]
    pub fn is_selected(&self, list: ConditionList, condition: &str) -> bool {
        self.selected(list).iter().any(|c| c == condition)
    }

    /// Checks or unchecks a catalogue entry. Unknown entries are ignored.
    pub fn toggle(&mut self, list: ConditionList, condition: &str) {
        if !list.options().contains(&condition) {
            return;
        }
        let selected = match list {
            ConditionList::ChronicDiseases => &mut self.chronic_diseases,
            ConditionList::Predispositions => &mut self.predispositions,
        };
        if let Some(index) = selected.iter().position(|c| c == condition) {
            selected.remove(index);
        } else {
            selected.push(condition.to_string());
        }
    }

    /// Validates first name, last name, RUT and birth date, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the failing field with its message.
    pub fn submit(&mut self, author: UserId, today: NaiveDate) -> Result<NewPatient, ValidationErrors> {
        let birth_date = match self.check(today) {
            Ok(date) => date,
            Err((field, message)) => {
                self.errors.insert(field, message);
                self.errors.set_form(message);
                return Err(self.errors.clone());
            }
        };
        self.errors.clear();

        Ok(NewPatient {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            rut: self.rut.clone(),
            birth_date,
            chronic_diseases: self.chronic_diseases.clone(),
            predispositions: self.predispositions.clone(),
            created_by: author,
            updated_by: author,
        })
    }

    fn check(&self, today: NaiveDate) -> Result<NaiveDate, (&'static str, &'static str)> {
        if self.first_name.trim().is_empty() {
            return Err(("first_name", "First name cannot be empty."));
        }
        if self.last_name.trim().is_empty() {
            return Err(("last_name", "Last name cannot be empty."));
        }
        if !validate_rut(&self.rut) {
            return Err(("rut", "Enter a valid RUT."));
        }
        let date = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| ("birth_date", "Enter a valid birth date (YYYY-MM-DD)."))?;
        if date > today {
            return Err(("birth_date", "Birth date cannot be in the future."));
        }
        Ok(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn filled() -> PatientForm {
        let mut form = PatientForm::new();
        form.set_first_name("juan pablo");
        form.set_last_name("soto");
        form.set_rut("123456785");
        form.set_birth_date("1950-03-14");
        form
    }

    #[test]
    fn test_names_are_capitalized() {
        let form = filled();
        assert_eq!(form.first_name(), "Juan Pablo");
        assert_eq!(form.last_name(), "Soto");
    }

    #[test]
    fn test_rut_is_formatted_with_live_error() {
        let mut form = PatientForm::new();
        form.set_rut("123456780");
        assert_eq!(form.rut(), "12.345.678-0");
        assert_eq!(form.errors().get("rut"), Some(INVALID_RUT));

        form.set_rut("12.345.678-5");
        assert!(!form.errors().has("rut"));
    }

    #[test]
    fn test_submit_checks_in_order() {
        let mut form = PatientForm::new();
        form.set_rut("1");
        let errors = form.submit(UserId(7), today()).unwrap_err();
        assert!(errors.has("first_name"));

        form.set_first_name("ana");
        let errors = form.submit(UserId(7), today()).unwrap_err();
        assert_eq!(errors.form(), Some("Last name cannot be empty."));

        form.set_last_name("rojas");
        let errors = form.submit(UserId(7), today()).unwrap_err();
        assert_eq!(errors.form(), Some("Enter a valid RUT."));
    }

    #[test]
    fn test_birth_date_in_future_is_rejected() {
        let mut form = filled();
        form.set_birth_date("2024-06-02");
        let errors = form.submit(UserId(7), today()).unwrap_err();
        assert!(errors.has("birth_date"));

        form.set_birth_date("14/03/1950");
        assert!(form.submit(UserId(7), today()).is_err());
    }

    #[test]
    fn test_submit_builds_payload() {
        let mut form = filled();
        form.toggle(ConditionList::ChronicDiseases, "Diabetes Mellitus");
        form.toggle(ConditionList::Predispositions, "Tabaquismo");
        form.toggle(ConditionList::Predispositions, "Inmovilidad");
        form.toggle(ConditionList::Predispositions, "Tabaquismo");
        form.toggle(ConditionList::Predispositions, "Not in catalogue");

        let patient = form.submit(UserId(7), today()).unwrap();

        assert_eq!(patient.rut, "12.345.678-5");
        assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(1950, 3, 14).unwrap());
        assert_eq!(patient.chronic_diseases, vec!["Diabetes Mellitus"]);
        assert_eq!(patient.predispositions, vec!["Inmovilidad"]);
        assert_eq!(patient.created_by, UserId(7));
        assert!(form.errors().is_empty());
    }
}
