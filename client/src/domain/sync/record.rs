//! Controller for entities managed as a single record.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::engine::SyncEngine;
use super::{MutationPolicy, RecordBinding, SyncOptions};
use crate::domain::ports::RemoteGateway;
use crate::domain::{RemoteResult, SessionContext, SyncError};

/// Synchronisation controller for one record entity.
pub struct RecordController<G: ?Sized, B: RecordBinding> {
    engine: SyncEngine<G, B::Record>,
    binding: B,
}

impl<G, B> RecordController<G, B>
where
    G: RemoteGateway + ?Sized,
    B: RecordBinding,
{
    /// Create a controller using the binding's default options.
    pub fn new(gateway: Arc<G>, session: SessionContext, binding: B) -> Self {
        let options = binding.options();
        Self::with_options(gateway, session, binding, options)
    }

    /// Create a controller with explicit options.
    pub fn with_options(
        gateway: Arc<G>,
        session: SessionContext,
        binding: B,
        options: SyncOptions,
    ) -> Self {
        let entity = binding.entity_name();
        Self {
            engine: SyncEngine::new(gateway, session, options, entity),
            binding,
        }
    }

    /// Snapshot of the visible state.
    #[must_use]
    pub fn state(&self) -> RemoteResult<B::Record> {
        self.engine.state().snapshot()
    }

    /// Watch the visible state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<B::Record>> {
        self.engine.state().subscribe()
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> SyncOptions {
        self.engine.options()
    }

    /// The entity binding.
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Load the record from the server.
    ///
    /// Returns [`SyncError::superseded`] when a later fetch already settled.
    pub async fn fetch(&self) -> Result<B::Record, SyncError> {
        let binding = &self.binding;
        self.engine
            .load(
                |identity| binding.fetch_operation(identity),
                |data| binding.project(data),
            )
            .await
    }

    /// Save the whole record.
    ///
    /// `PersistThenRefetch` shows the new record immediately, sends it, and
    /// refetches. `LocalOnly` only replaces the in-memory record.
    pub async fn save(&self, record: B::Record) -> Result<(), SyncError> {
        if self.engine.options().mutation_policy == MutationPolicy::LocalOnly {
            let ticket = self.engine.state().issue();
            self.engine.state().settle(ticket, RemoteResult::Success(record));
            debug!(entity = self.engine.entity(), "record replaced locally");
            return Ok(());
        }

        let _guard = self.engine.enter_flight()?;
        let identity = self.engine.identity()?;
        let operation = self
            .binding
            .save_operation(identity, &record)
            .ok_or_else(|| {
                SyncError::unsupported(format!("{} does not support saving", self.engine.entity()))
            })?;

        self.engine.state().modify_success(|current| *current = record);
        self.engine.mutate(operation).await?;
        match self.fetch().await {
            Err(error) if !error.is_superseded() => Err(error),
            _ => Ok(()),
        }
    }

    /// Edit the loaded record in memory only.
    pub fn edit_local(&self, edit: impl FnOnce(&mut B::Record)) -> Result<(), SyncError> {
        self.engine.state().modify_success(edit).ok_or_else(|| {
            SyncError::invalid_request(format!("{} is not loaded", self.engine.entity()))
        })
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
