//! Form state machines and session context.

pub mod account_form;
pub mod field_rules;
pub mod patient_form;
pub mod patient_search;
pub mod session;
pub mod wound_care_wizard;
pub mod wound_form;

pub use account_form::AccountForm;
pub use patient_form::{ConditionList, PatientForm};
pub use session::{SessionContext, SessionState};
pub use wound_care_wizard::{CareField, EditRejected, FieldKind, Section, WoundCareWizard};
pub use wound_form::WoundForm;
