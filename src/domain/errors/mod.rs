mod api_error;
mod session_error;
mod storage_error;
pub mod validation_error;

pub use api_error::ApiError;
pub use session_error::SessionError;
pub use storage_error::StorageError;
pub use validation_error::ValidationErrors;
