//! Domain layer with clinical entities, catalogues and port definitions.

/// Clinical option catalogues.
pub mod catalog;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Pure domain rules.
pub mod services;

pub use entities::{AuthToken, User};
pub use errors::{ApiError, StorageError};
pub use ports::{AuthPort, ClinicalDataPort, SessionStoragePort};
