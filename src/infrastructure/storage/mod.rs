//! Session storage adapters.

mod file_storage;
mod keyring_storage;

pub use file_storage::FileSessionStorage;
pub use keyring_storage::KeyringSessionStorage;
