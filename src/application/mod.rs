//! Application layer with use cases, form state and DTOs.

/// Data transfer objects.
pub mod dto;
/// Session context and form state machines.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginMethod, LoginRequest, LoginResponse};
pub use services::{SessionContext, SessionState};
pub use use_cases::{CheckTokenUseCase, ClinicalRecordsUseCase, CreateAccountUseCase, LoginUseCase};
