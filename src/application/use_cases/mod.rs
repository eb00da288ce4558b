//! Use case implementations.

mod check_token_use_case;
mod clinical_records_use_case;
mod create_account_use_case;
mod login_use_case;

pub use check_token_use_case::CheckTokenUseCase;
pub use clinical_records_use_case::{ClinicalRecordsUseCase, PatientRecord, WoundHistory};
pub use create_account_use_case::CreateAccountUseCase;
pub use login_use_case::LoginUseCase;
