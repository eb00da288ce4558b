//! Patient, wound and wound-care record operations for the signed-in clinician.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::SessionContext;
use crate::domain::entities::{
    AuthToken, Patient, PatientId, Wound, WoundCare, WoundId, sort_chronologically,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ClinicalDataPort, NewPatient, NewWound, NewWoundCare, WoundCareFilter};

/// A patient with their registered wounds.
#[derive(Debug, Clone)]
pub struct PatientRecord {
    pub patient: Patient,
    pub wounds: Vec<Wound>,
}

/// Everything shown on the wound-care history screen.
#[derive(Debug, Clone)]
pub struct WoundHistory {
    pub patient: Patient,
    pub wound: Wound,
    /// Oldest first.
    pub entries: Vec<WoundCare>,
}

/// Reads and writes clinical records with the session's bearer token.
#[derive(Clone)]
pub struct ClinicalRecordsUseCase {
    data_port: Arc<dyn ClinicalDataPort>,
}

impl ClinicalRecordsUseCase {
    #[must_use]
    pub const fn new(data_port: Arc<dyn ClinicalDataPort>) -> Self {
        Self { data_port }
    }

    fn token(session: &SessionContext) -> Result<&AuthToken, ApiError> {
        session.token().ok_or(ApiError::NoSession)
    }

    /// # Errors
    /// Returns error if there is no session or the request fails.
    pub async fn list_patients(&self, session: &SessionContext) -> Result<Vec<Patient>, ApiError> {
        let patients = self.data_port.list_patients(Self::token(session)?).await?;
        debug!(count = patients.len(), "Patients loaded");
        Ok(patients)
    }

    /// Loads a patient and their wounds concurrently.
    ///
    /// # Errors
    /// Returns error if either request fails.
    pub async fn patient_record(
        &self,
        session: &SessionContext,
        id: PatientId,
    ) -> Result<PatientRecord, ApiError> {
        let token = Self::token(session)?;
        let (patient, wounds) = tokio::try_join!(
            self.data_port.get_patient(token, id),
            self.data_port.list_wounds(token, id),
        )?;
        Ok(PatientRecord { patient, wounds })
    }

    /// Loads the patient, the wound and its entries ordered by care date.
    ///
    /// # Errors
    /// Returns error if any request fails.
    pub async fn wound_history(
        &self,
        session: &SessionContext,
        patient: PatientId,
        wound: WoundId,
    ) -> Result<WoundHistory, ApiError> {
        let token = Self::token(session)?;
        let (patient, wound, mut entries) = tokio::try_join!(
            self.data_port.get_patient(token, patient),
            self.data_port.get_wound(token, wound),
            self.data_port
                .list_wound_cares(token, WoundCareFilter::for_wound(patient, wound)),
        )?;
        entries.retain(|entry| entry.wound == wound.id());
        sort_chronologically(&mut entries);
        Ok(WoundHistory {
            patient,
            wound,
            entries,
        })
    }

    /// # Errors
    /// Returns error if the backend refuses the patient.
    pub async fn register_patient(
        &self,
        session: &SessionContext,
        patient: &NewPatient,
    ) -> Result<Patient, ApiError> {
        let created = self
            .data_port
            .create_patient(Self::token(session)?, patient)
            .await?;
        info!(patient_id = %created.id(), "Patient registered");
        Ok(created)
    }

    /// # Errors
    /// Returns error if the backend refuses the wound.
    pub async fn register_wound(
        &self,
        session: &SessionContext,
        wound: &NewWound,
    ) -> Result<Wound, ApiError> {
        let created = self
            .data_port
            .create_wound(Self::token(session)?, wound)
            .await?;
        info!(wound_id = %created.id(), patient_id = %created.patient(), "Wound registered");
        Ok(created)
    }

    /// # Errors
    /// Returns error if the backend refuses the entry.
    pub async fn record_wound_care(
        &self,
        session: &SessionContext,
        care: &NewWoundCare,
    ) -> Result<WoundCare, ApiError> {
        let created = self
            .data_port
            .create_wound_care(Self::token(session)?, care)
            .await?;
        info!(wound_care_id = %created.id, wound_id = %created.wound, "Wound care recorded");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{User, WoundCareId, WoundOrigin};
    use crate::domain::ports::MockClinicalDataPort;
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStorage};
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn signed_in() -> SessionContext {
        let mut session = SessionContext::new(Arc::new(MockSessionStorage::new()));
        session.restore(MockAuthPort::token(), User::new(7_u64, "Ana", "Rojas", "ana@clinic.cl"));
        session
    }

    fn entry(id: u64, wound: u64, care_date: Option<NaiveDate>) -> WoundCare {
        let mut json = serde_json::json!({
            "id": id, "wound": wound, "width": 1, "height": 1, "depth": 1,
            "granulation_tissue": 0, "slough": 0, "necrotic_tissue": 0,
        });
        if let Some(day) = care_date {
            json["care_date"] = serde_json::json!(day.to_string());
        }
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_no_session_is_rejected_without_calls() {
        let mock = MockClinicalDataPort::new();
        let use_case = ClinicalRecordsUseCase::new(Arc::new(mock));
        let session = SessionContext::new(Arc::new(MockSessionStorage::new()));

        let error = use_case.list_patients(&session).await.unwrap_err();

        assert!(error.requires_logout());
    }

    #[tokio::test]
    async fn test_history_is_sorted_and_scoped_to_wound() {
        let mut mock = MockClinicalDataPort::new();
        mock.expect_get_patient()
            .with(mockall::predicate::always(), eq(PatientId(4)))
            .times(1)
            .returning(|_, id| Ok(Patient::new(id, "Juan", "Soto", "12.345.678-5", date(1950, 3, 14))));
        mock.expect_get_wound()
            .times(1)
            .returning(|_, id| {
                Ok(Wound::new(id, 4_u64, "Sacro", WoundOrigin::PressureInjury, date(2024, 5, 1)))
            });
        mock.expect_list_wound_cares()
            .with(
                mockall::predicate::always(),
                eq(WoundCareFilter::for_wound(PatientId(4), WoundId(9))),
            )
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    entry(3, 9, Some(date(2024, 6, 10))),
                    entry(2, 9, Some(date(2024, 6, 1))),
                    entry(5, 8, Some(date(2024, 5, 1))),
                    entry(1, 9, Some(date(2024, 6, 10))),
                ])
            });
        let use_case = ClinicalRecordsUseCase::new(Arc::new(mock));

        let history = use_case
            .wound_history(&signed_in(), PatientId(4), WoundId(9))
            .await
            .unwrap();

        let ids: Vec<WoundCareId> = history.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![WoundCareId(2), WoundCareId(1), WoundCareId(3)]);
        assert_eq!(history.wound.location(), "Sacro");
    }

    #[tokio::test]
    async fn test_unauthorized_is_propagated() {
        let mut mock = MockClinicalDataPort::new();
        mock.expect_list_patients()
            .returning(|_| Err(ApiError::unauthorized("expired")));
        let use_case = ClinicalRecordsUseCase::new(Arc::new(mock));

        let error = use_case.list_patients(&signed_in()).await.unwrap_err();

        assert!(error.requires_logout());
    }

    #[tokio::test]
    async fn test_patient_record_joins_wounds() {
        let mut mock = MockClinicalDataPort::new();
        mock.expect_get_patient()
            .returning(|_, id| Ok(Patient::new(id, "Juan", "Soto", "12.345.678-5", date(1950, 3, 14))));
        mock.expect_list_wounds()
            .with(mockall::predicate::always(), eq(PatientId(4)))
            .returning(|_, patient| {
                Ok(vec![Wound::new(9_u64, patient, "Talón", WoundOrigin::DiabeticFoot, date(2024, 1, 2))])
            });
        let use_case = ClinicalRecordsUseCase::new(Arc::new(mock));

        let record = use_case.patient_record(&signed_in(), PatientId(4)).await.unwrap();

        assert_eq!(record.patient.full_name(), "Juan Soto");
        assert_eq!(record.wounds.len(), 1);
    }
}
