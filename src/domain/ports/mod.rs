mod auth_port;
mod clinical_data_port;
mod session_storage_port;

pub use auth_port::{AuthPort, Credentials, NewAccount};
pub use clinical_data_port::{
    ClinicalDataPort, NewPatient, NewWound, NewWoundCare, WoundCareFilter,
};
pub use session_storage_port::{PersistedSession, SessionStoragePort};

#[cfg(test)]
pub use clinical_data_port::MockClinicalDataPort;
