//! Infrastructure layer with external service adapters.

/// CuraMetric REST API client.
pub mod api;
/// Application configuration.
pub mod config;
/// Session storage adapters.
pub mod storage;

pub use api::CurametricClient;
pub use config::{AppConfig, CliArgs, LogLevel, SessionStoreKind, StorageManager};
pub use storage::{FileSessionStorage, KeyringSessionStorage};
