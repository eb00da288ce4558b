//! Clinical records port: patients, wounds and wound-care entries.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::{
    AuthToken, Patient, PatientId, TissueComposition, UserId, Wound, WoundCare, WoundCareId,
    WoundDimensions, WoundId, WoundOrigin,
};
use crate::domain::errors::ApiError;

/// Patient registration payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub rut: String,
    pub birth_date: NaiveDate,
    pub chronic_diseases: Vec<String>,
    pub predispositions: Vec<String>,
    pub created_by: UserId,
    pub updated_by: UserId,
}

/// Wound registration payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWound {
    pub patient: PatientId,
    #[serde(rename = "wound_location")]
    pub location: String,
    #[serde(rename = "wound_origin")]
    pub origin: WoundOrigin,
    #[serde(rename = "wound_origin_date")]
    pub origin_date: NaiveDate,
    pub created_by: UserId,
    pub updated_by: UserId,
}

/// Wound-care observation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWoundCare {
    pub wound: WoundId,
    pub patient: PatientId,
    pub care_date: NaiveDate,
    #[serde(flatten)]
    pub dimensions: WoundDimensions,
    #[serde(flatten)]
    pub tissue: TissueComposition,
    pub borders: String,
    pub surrounding_skin: String,
    pub edema: String,
    pub exudate_amount: String,
    pub exudate_type: String,
    pub debridement: bool,
    pub primary_dressing: Option<String>,
    pub secondary_dressing: Option<String>,
    pub next_care_date: Option<NaiveDate>,
    pub care_notes: String,
    pub wound_pain: String,
    pub skin_protection: String,
    #[serde(rename = "wound_cleaning_solution")]
    pub cleaning_solution: String,
    pub created_by: UserId,
    pub updated_by: UserId,
}

/// Query filters for listing wound-care entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WoundCareFilter {
    pub patient: Option<PatientId>,
    pub wound: Option<WoundId>,
}

impl WoundCareFilter {
    #[must_use]
    pub const fn for_wound(patient: PatientId, wound: WoundId) -> Self {
        Self {
            patient: Some(patient),
            wound: Some(wound),
        }
    }

    /// Query string pairs in a stable order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(patient) = self.patient {
            pairs.push(("patient", patient.to_string()));
        }
        if let Some(wound) = self.wound {
            pairs.push(("wound", wound.to_string()));
        }
        pairs
    }
}

/// Port for the clinical records endpoints. Every call is authenticated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicalDataPort: Send + Sync {
    async fn list_patients(&self, token: &AuthToken) -> Result<Vec<Patient>, ApiError>;

    async fn get_patient(&self, token: &AuthToken, id: PatientId) -> Result<Patient, ApiError>;

    async fn create_patient(
        &self,
        token: &AuthToken,
        patient: &NewPatient,
    ) -> Result<Patient, ApiError>;

    /// Lists the wounds registered for a patient.
    async fn list_wounds(&self, token: &AuthToken, patient: PatientId)
    -> Result<Vec<Wound>, ApiError>;

    async fn get_wound(&self, token: &AuthToken, id: WoundId) -> Result<Wound, ApiError>;

    async fn create_wound(&self, token: &AuthToken, wound: &NewWound) -> Result<Wound, ApiError>;

    async fn list_wound_cares(
        &self,
        token: &AuthToken,
        filter: WoundCareFilter,
    ) -> Result<Vec<WoundCare>, ApiError>;

    async fn get_wound_care(
        &self,
        token: &AuthToken,
        id: WoundCareId,
    ) -> Result<WoundCare, ApiError>;

    async fn create_wound_care(
        &self,
        token: &AuthToken,
        care: &NewWoundCare,
    ) -> Result<WoundCare, ApiError>;
}
