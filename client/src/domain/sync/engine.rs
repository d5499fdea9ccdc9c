//! Shared machinery behind collection and record controllers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::{debug, warn};

use super::{ObservableState, SyncOptions};
use crate::domain::ports::RemoteGateway;
use crate::domain::{Operation, RemoteResult, SessionContext, SyncError, UserIdentity};

/// Releases the in-flight flag when a guarded mutation finishes.
pub(crate) struct FlightGuard<'a>(Option<&'a AtomicBool>);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(flag) = self.0 {
            flag.store(false, Ordering::SeqCst);
        }
    }
}

pub(crate) struct SyncEngine<G: ?Sized, T> {
    gateway: Arc<G>,
    session: SessionContext,
    state: ObservableState<T>,
    options: SyncOptions,
    in_flight: AtomicBool,
    entity: &'static str,
}

impl<G, T> SyncEngine<G, T>
where
    G: RemoteGateway + ?Sized,
    T: Clone + Send + Sync,
{
    pub(crate) fn new(
        gateway: Arc<G>,
        session: SessionContext,
        options: SyncOptions,
        entity: &'static str,
    ) -> Self {
        Self {
            gateway,
            session,
            state: ObservableState::new(options.ordering),
            options,
            in_flight: AtomicBool::new(false),
            entity,
        }
    }

    pub(crate) fn state(&self) -> &ObservableState<T> {
        &self.state
    }

    pub(crate) fn options(&self) -> SyncOptions {
        self.options
    }

    pub(crate) fn entity(&self) -> &'static str {
        self.entity
    }

    /// Resolve the session identity or publish the precondition failure.
    pub(crate) fn identity(&self) -> Result<&UserIdentity, SyncError> {
        self.session.identity().ok_or_else(|| {
            warn!(entity = self.entity, "no user identity; gateway not called");
            self.fail(SyncError::not_logged_in())
        })
    }

    /// Publish an error that happened before any remote call.
    pub(crate) fn fail(&self, error: SyncError) -> SyncError {
        let ticket = self.state.issue();
        self.state
            .settle(ticket, RemoteResult::Error(error.message().to_owned()));
        error
    }

    pub(crate) fn enter_flight(&self) -> Result<FlightGuard<'_>, SyncError> {
        if !self.options.guard_in_flight {
            return Ok(FlightGuard(None));
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!(entity = self.entity, "mutation rejected while another is in flight");
            return Err(SyncError::busy());
        }
        Ok(FlightGuard(Some(&self.in_flight)))
    }

    pub(crate) fn unsupported(&self, action: &str) -> SyncError {
        SyncError::unsupported(format!("{} do not support {action}", self.entity))
    }

    pub(crate) fn not_loaded(&self) -> SyncError {
        SyncError::invalid_request(format!("{} are not loaded", self.entity))
    }

    /// Run a query and publish its projected result.
    ///
    /// A successful result that the ordering policy discards comes back as
    /// [`SyncError::superseded`], so callers never act on rows nobody sees.
    pub(crate) async fn load(
        &self,
        build: impl FnOnce(&UserIdentity) -> Operation,
        project: impl FnOnce(&Value) -> Result<T, SyncError>,
    ) -> Result<T, SyncError> {
        let operation = build(self.identity()?);
        let ticket = self.state.issue();
        self.state.show_loading();
        debug!(
            entity = self.entity,
            operation = operation.name(),
            sequence = ticket.sequence(),
            "fetch issued"
        );

        let outcome = self
            .gateway
            .execute(&operation)
            .await
            .map_err(SyncError::from)
            .and_then(|data| project(&data));
        if let Err(error) = &outcome {
            warn!(
                entity = self.entity,
                operation = operation.name(),
                error = %error,
                "fetch failed"
            );
        }
        let applied = self.state.settle(ticket, RemoteResult::from(outcome.clone()));
        match outcome {
            Ok(_) if !applied => Err(SyncError::superseded()),
            outcome => outcome,
        }
    }

    /// Run a mutation. Only failures touch the visible state; success is
    /// followed by a refetch in the caller.
    pub(crate) async fn mutate(&self, operation: Operation) -> Result<(), SyncError> {
        let ticket = self.state.issue();
        if self.options.loading_on_mutation {
            self.state.show_loading();
        }
        debug!(
            entity = self.entity,
            operation = operation.name(),
            sequence = ticket.sequence(),
            "mutation issued"
        );

        match self.gateway.execute(&operation).await {
            Ok(_) => Ok(()),
            Err(error) => {
                let error = SyncError::from(error);
                warn!(
                    entity = self.entity,
                    operation = operation.name(),
                    error = %error,
                    "mutation failed"
                );
                self.state
                    .settle(ticket, RemoteResult::Error(error.message().to_owned()));
                Err(error)
            }
        }
    }
}
