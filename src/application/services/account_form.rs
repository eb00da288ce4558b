//! Create-account form state.

use zeroize::Zeroizing;

use crate::domain::errors::ValidationErrors;
use crate::domain::ports::{Credentials, NewAccount};

/// Input collected on the create-account screen.
#[derive(Default)]
pub struct AccountForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub confirm_password: Zeroizing<String>,
    errors: ValidationErrors,
}

impl AccountForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Checks every field at once.
    ///
    /// # Errors
    /// Returns all failing fields.
    pub fn submit(&mut self) -> Result<NewAccount, ValidationErrors> {
        self.errors.clear();
        if self.first_name.trim().is_empty() {
            self.errors.insert("first_name", "First name is required.");
        }
        if self.last_name.trim().is_empty() {
            self.errors.insert("last_name", "Last name is required.");
        }
        if self.email.trim().is_empty() {
            self.errors.insert("email", "Email is required.");
        }
        if self.password.trim().is_empty() {
            self.errors.insert("password", "Password is required.");
        }
        if *self.password != *self.confirm_password {
            self.errors.insert("confirm_password", "Passwords do not match.");
        }
        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }

        Ok(NewAccount {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            credentials: Credentials::new(self.email.as_str(), self.password.as_str()),
        })
    }
}

impl std::fmt::Debug for AccountForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_reports_every_field() {
        let mut form = AccountForm::new();
        let errors = form.submit().unwrap_err();
        for field in ["first_name", "last_name", "email", "password"] {
            assert!(errors.has(field), "{field}");
        }
        assert!(!errors.has("confirm_password"));
    }

    #[test]
    fn test_password_mismatch() {
        let mut form = AccountForm::new();
        form.first_name = "Ana".into();
        form.last_name = "Rojas".into();
        form.email = "ana@clinic.cl".into();
        form.password = Zeroizing::new("one".into());
        form.confirm_password = Zeroizing::new("two".into());

        let errors = form.submit().unwrap_err();
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match."));

        form.confirm_password = Zeroizing::new("one".into());
        let account = form.submit().unwrap();
        assert_eq!(account.credentials.email, "ana@clinic.cl");
        assert!(form.errors().is_empty());
    }
}
