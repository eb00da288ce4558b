//! Domain entity definitions.

mod patient;
mod token;
mod user;
mod wound;
mod wound_care;

pub use patient::{Patient, PatientId, years_between};
pub use token::AuthToken;
pub use user::{User, UserId};
pub use wound::{Wound, WoundId, WoundOrigin};
pub use wound_care::{
    TissueComposition, WoundCare, WoundCareId, WoundDimensions, sort_chronologically,
};
