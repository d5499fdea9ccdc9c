//! Driven port for the locally persisted session identity.
//!
//! The store is a small key-value file on device, so the interface is
//! synchronous. Controllers never read it directly: the session service
//! resolves it once into a `SessionContext` that is threaded through
//! constructors.

use std::sync::{Mutex, PoisonError};

use super::define_port_error;
use crate::domain::UserIdentity;

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "credential store I/O failed: {message}",
        /// Stored data exists but cannot be decoded into an identity.
        Corrupt { message: String } => "credential store is corrupt: {message}",
    }
}

/// Port for loading, saving, and clearing the active identity.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Return the stored identity, or `None` when no session exists.
    fn identity(&self) -> Result<Option<UserIdentity>, CredentialStoreError>;

    /// Persist `identity` as the active session.
    fn save(&self, identity: &UserIdentity) -> Result<(), CredentialStoreError>;

    /// Forget the active session. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Process-local store used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<UserIdentity>>,
}

impl InMemoryCredentialStore {
    /// Create a store that already holds `identity`.
    #[must_use]
    pub fn holding(identity: UserIdentity) -> Self {
        Self {
            slot: Mutex::new(Some(identity)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn identity(&self) -> Result<Option<UserIdentity>, CredentialStoreError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, identity: &UserIdentity) -> Result<(), CredentialStoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}
