//! Controller for entities managed as an ordered collection.
//!
//! Remote mutations follow the binding's [`MutationPolicy`]:
//!
//! - `PersistThenRefetch` applies the edit optimistically, sends the
//!   mutation, and refetches so the canonical server rows replace local ones.
//! - `LocalOnly` edits the in-memory rows and records what changed;
//!   [`CollectionController::submit`] later persists everything in one pass.
//!
//! Requests rejected before reaching the gateway (`Unsupported`, `Busy`,
//! `InvalidRequest`) return an error without touching the visible state.
//! So does a fetch whose result lost to a later one (`Superseded`).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::engine::SyncEngine;
use super::{CollectionBinding, MutationPolicy, SyncOptions};
use crate::domain::ports::RemoteGateway;
use crate::domain::{Entity, EntityId, Operation, RemoteResult, SessionContext, SyncError};

/// Rows as exposed to observers.
pub type Rows<F> = Vec<Entity<F>>;

/// Synchronisation controller for one collection entity.
pub struct CollectionController<G: ?Sized, B: CollectionBinding> {
    engine: SyncEngine<G, Rows<B::Fields>>,
    binding: B,
    pending_removals: Mutex<Vec<String>>,
    unsent: Mutex<Option<Rows<B::Fields>>>,
}

enum Change<F> {
    Row(Entity<F>),
    Removal(String),
}

impl<G, B> CollectionController<G, B>
where
    G: RemoteGateway + ?Sized,
    B: CollectionBinding,
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
            pending_removals: Mutex::new(Vec::new()),
            unsent: Mutex::new(None),
        }
    }

    /// Snapshot of the visible state.
    #[must_use]
    pub fn state(&self) -> RemoteResult<Rows<B::Fields>> {
        self.engine.state().snapshot()
    }

    /// Watch the visible state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<Rows<B::Fields>>> {
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

    /// Server ids removed locally and waiting for `submit`.
    #[must_use]
    pub fn pending_removals(&self) -> Vec<String> {
        self.lock_removals().clone()
    }

    /// Rows a failed `submit` still has to send.
    ///
    /// A failed pass replaces the visible rows with `Error`; these rows are
    /// what the next `submit` persists.
    #[must_use]
    pub fn unsent_rows(&self) -> Rows<B::Fields> {
        self.lock_unsent().clone().unwrap_or_default()
    }

    /// Load the collection from the server.
    ///
    /// A fetch that replaces the visible rows drops queued local removals
    /// and unsent rows with them. A fetch overtaken by a later one returns
    /// [`SyncError::superseded`] and leaves local changes queued.
    pub async fn fetch(&self) -> Result<Rows<B::Fields>, SyncError> {
        let binding = &self.binding;
        let rows = self
            .engine
            .load(
                |identity| binding.fetch_operation(identity),
                |data| binding.project(data),
            )
            .await?;
        self.lock_removals().clear();
        *self.lock_unsent() = None;
        Ok(rows)
    }

    /// Add a row.
    ///
    /// Returns the temporary id of the row inserted locally. Under
    /// `PersistThenRefetch` that row is replaced by the refetched server
    /// row once the call returns successfully.
    pub async fn add(&self, fields: B::Fields) -> Result<EntityId, SyncError> {
        if self.local_only() {
            let draft = Entity::draft(fields);
            let id = draft.id().clone();
            self.engine
                .state()
                .modify_success(|rows| rows.push(draft))
                .ok_or_else(|| self.engine.not_loaded())?;
            debug!(entity = self.engine.entity(), id = %id, "row added locally");
            return Ok(id);
        }

        let _guard = self.engine.enter_flight()?;
        let identity = self.engine.identity()?;
        let operation = self
            .binding
            .add_operation(identity, &fields)
            .ok_or_else(|| self.engine.unsupported("adding rows"))?;

        let draft = Entity::draft(fields);
        let id = draft.id().clone();
        self.engine.state().modify_success(|rows| rows.push(draft));
        self.persist(operation).await?;
        Ok(id)
    }

    /// Replace the fields of row `id`.
    pub async fn update(&self, id: &EntityId, fields: B::Fields) -> Result<(), SyncError> {
        if self.local_only() {
            return self.edit_row(id, |row| row.replace_fields(fields));
        }

        let Some(server_id) = id.as_server() else {
            return Err(SyncError::invalid_request(format!(
                "{} row {id} has not been saved yet",
                self.engine.entity()
            )));
        };
        let _guard = self.engine.enter_flight()?;
        let identity = self.engine.identity()?;
        let operation = self
            .binding
            .update_operation(identity, server_id, &fields)
            .ok_or_else(|| self.engine.unsupported("updating rows"))?;

        self.engine.state().modify_success(|rows| {
            if let Some(row) = rows.iter_mut().find(|row| row.id() == id) {
                *row.fields_mut() = fields;
            }
        });
        self.persist(operation).await
    }

    /// Remove row `id`.
    ///
    /// Temporary rows were never persisted, so removing one is always local.
    pub async fn remove(&self, id: &EntityId) -> Result<(), SyncError> {
        let server_id = match id.as_server() {
            Some(server_id) if !self.local_only() => server_id,
            _ => {
                self.take_row(id)?;
                if let Some(server_id) = id.as_server() {
                    self.lock_removals().push(server_id.to_owned());
                }
                debug!(entity = self.engine.entity(), id = %id, "row removed locally");
                return Ok(());
            }
        };

        let _guard = self.engine.enter_flight()?;
        let identity = self.engine.identity()?;
        let operation = self
            .binding
            .remove_operation(identity, server_id)
            .ok_or_else(|| self.engine.unsupported("removing rows"))?;

        self.engine
            .state()
            .modify_success(|rows| rows.retain(|row| row.id() != id));
        self.persist(operation).await
    }

    /// Edit the row at `index` in memory only.
    ///
    /// The row is not marked modified, so `submit` will not persist the
    /// edit on its own.
    pub fn edit_local_at(
        &self,
        index: usize,
        edit: impl FnOnce(&mut B::Fields),
    ) -> Result<(), SyncError> {
        self.engine
            .state()
            .modify_success(|rows| rows.get_mut(index).map(|row| edit(row.fields_mut())))
            .ok_or_else(|| self.engine.not_loaded())?
            .ok_or_else(|| {
                SyncError::invalid_request(format!(
                    "no {} row at position {index}",
                    self.engine.entity()
                ))
            })
    }

    /// Edit row `id` in memory only.
    pub fn edit_local(&self, id: &EntityId, edit: impl FnOnce(&mut B::Fields)) -> Result<(), SyncError> {
        self.edit_row(id, |row| edit(row.fields_mut()))
    }

    /// Persist local-only changes, then refetch.
    ///
    /// Temporary rows become add mutations, modified rows become updates,
    /// and queued removals become deletes. Mutations run one after another
    /// and the first failure stops the pass. Removals already sent leave the
    /// queue; everything else stays queued (see [`Self::unsent_rows`]) for
    /// the next call.
    pub async fn submit(&self) -> Result<(), SyncError> {
        let _guard = self.engine.enter_flight()?;
        let identity = self.engine.identity()?;

        let rows = match self.engine.state().snapshot().into_success() {
            Some(rows) => rows,
            None => self
                .lock_unsent()
                .clone()
                .ok_or_else(|| self.engine.not_loaded())?,
        };
        let mut changes = Vec::new();
        for row in rows {
            let operation = match row.id() {
                EntityId::Temporary(_) => self
                    .binding
                    .add_operation(identity, row.fields())
                    .ok_or_else(|| self.engine.unsupported("adding rows"))?,
                EntityId::Server(id) if row.is_modified() => self
                    .binding
                    .update_operation(identity, id, row.fields())
                    .ok_or_else(|| self.engine.unsupported("updating rows"))?,
                EntityId::Server(_) => continue,
            };
            changes.push((operation, Change::Row(row)));
        }
        for id in self.pending_removals() {
            let operation = self
                .binding
                .remove_operation(identity, &id)
                .ok_or_else(|| self.engine.unsupported("removing rows"))?;
            changes.push((operation, Change::Removal(id)));
        }

        if changes.is_empty() {
            debug!(entity = self.engine.entity(), "nothing to submit");
            return Ok(());
        }

        let count = changes.len();
        let mut queue = changes.into_iter();
        while let Some((operation, change)) = queue.next() {
            if let Err(error) = self.engine.mutate(operation).await {
                let rows: Rows<B::Fields> = std::iter::once(change)
                    .chain(queue.by_ref().map(|(_, change)| change))
                    .filter_map(|change| match change {
                        Change::Row(row) => Some(row),
                        Change::Removal(_) => None,
                    })
                    .collect();
                warn!(
                    entity = self.engine.entity(),
                    rows = rows.len(),
                    removals = self.lock_removals().len(),
                    "submit stopped; unsent changes kept for retry"
                );
                *self.lock_unsent() = Some(rows);
                return Err(error);
            }
            if let Change::Removal(id) = change {
                self.lock_removals().retain(|queued| *queued != id);
            }
        }
        *self.lock_unsent() = None;
        info!(entity = self.engine.entity(), count, "local changes submitted");
        self.refetch().await
    }

    async fn refetch(&self) -> Result<(), SyncError> {
        match self.fetch().await {
            Err(error) if !error.is_superseded() => Err(error),
            _ => Ok(()),
        }
    }

    fn lock_removals(&self) -> MutexGuard<'_, Vec<String>> {
        self.pending_removals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_unsent(&self) -> MutexGuard<'_, Option<Rows<B::Fields>>> {
        self.unsent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn local_only(&self) -> bool {
        self.engine.options().mutation_policy == MutationPolicy::LocalOnly
    }

    async fn persist(&self, operation: Operation) -> Result<(), SyncError> {
        self.engine.mutate(operation).await?;
        self.refetch().await
    }

    fn edit_row(
        &self,
        id: &EntityId,
        edit: impl FnOnce(&mut Entity<B::Fields>),
    ) -> Result<(), SyncError> {
        self.engine
            .state()
            .modify_success(|rows| rows.iter_mut().find(|row| row.id() == id).map(edit))
            .ok_or_else(|| self.engine.not_loaded())?
            .ok_or_else(|| self.missing_row(id))
    }

    fn take_row(&self, id: &EntityId) -> Result<Entity<B::Fields>, SyncError> {
        self.engine
            .state()
            .modify_success(|rows| {
                rows.iter()
                    .position(|row| row.id() == id)
                    .map(|index| rows.remove(index))
            })
            .ok_or_else(|| self.engine.not_loaded())?
            .ok_or_else(|| self.missing_row(id))
    }

    fn missing_row(&self, id: &EntityId) -> SyncError {
        SyncError::invalid_request(format!("no {} row with id {id}", self.engine.entity()))
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
