//! Credential store outbound adapters.

mod file_store;

pub use file_store::{CREDENTIALS_FILE, FileCredentialStore};
