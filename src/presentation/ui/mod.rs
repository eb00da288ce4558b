//! UI screens.

mod add_wound_screen;
mod app;
mod create_account_screen;
mod history_screen;
mod login_screen;
mod new_patient_screen;
mod patient_detail_screen;
mod patient_list_screen;
mod wound_care_screen;

pub use add_wound_screen::{AddWoundAction, AddWoundScreen};
pub use app::App;
pub use create_account_screen::{CreateAccountAction, CreateAccountScreen};
pub use history_screen::{HistoryAction, HistoryScreen};
pub use login_screen::{LoginAction, LoginMode, LoginScreen, LoginState};
pub use new_patient_screen::{NewPatientAction, NewPatientScreen};
pub use patient_detail_screen::{PatientDetailAction, PatientDetailScreen};
pub use patient_list_screen::{PatientListAction, PatientListScreen};
pub use wound_care_screen::{WoundCareAction, WoundCareScreen};
