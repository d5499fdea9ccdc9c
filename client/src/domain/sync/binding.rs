//! Per-entity configuration consumed by the generic controllers.
//!
//! A binding knows how to build the entity's operations and how to project
//! the `data` payload into records. Mutation builders return `None` when the
//! entity does not support that mutation; controllers turn that into an
//! `Unsupported` error without calling the gateway.

use std::fmt;

use serde_json::Value;

use super::SyncOptions;
use crate::domain::{Entity, Operation, SyncError, UserIdentity};

/// Binding for an entity managed as an ordered collection.
pub trait CollectionBinding: Send + Sync + 'static {
    /// UI-facing fields of one row.
    type Fields: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Plural, human-readable name used in logs and errors.
    fn entity_name(&self) -> &'static str;

    /// Default synchronisation behaviour for this entity.
    fn options(&self) -> SyncOptions {
        SyncOptions::default()
    }

    /// Query returning the whole collection.
    fn fetch_operation(&self, identity: &UserIdentity) -> Operation;

    /// Project the fetch payload into rows.
    fn project(&self, data: &Value) -> Result<Vec<Entity<Self::Fields>>, SyncError>;

    /// Mutation creating one row.
    fn add_operation(&self, _identity: &UserIdentity, _fields: &Self::Fields) -> Option<Operation> {
        None
    }

    /// Mutation replacing the fields of the server row `id`.
    fn update_operation(
        &self,
        _identity: &UserIdentity,
        _id: &str,
        _fields: &Self::Fields,
    ) -> Option<Operation> {
        None
    }

    /// Mutation deleting the server row `id`.
    fn remove_operation(&self, _identity: &UserIdentity, _id: &str) -> Option<Operation> {
        None
    }
}

/// Binding for an entity managed as a single record.
pub trait RecordBinding: Send + Sync + 'static {
    /// UI-facing record.
    type Record: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Singular, human-readable name used in logs and errors.
    fn entity_name(&self) -> &'static str;

    /// Default synchronisation behaviour for this entity.
    fn options(&self) -> SyncOptions {
        SyncOptions::default()
    }

    /// Query returning the record.
    fn fetch_operation(&self, identity: &UserIdentity) -> Operation;

    /// Project the fetch payload into the record.
    fn project(&self, data: &Value) -> Result<Self::Record, SyncError>;

    /// Mutation persisting the whole record.
    fn save_operation(&self, _identity: &UserIdentity, _record: &Self::Record) -> Option<Operation> {
        None
    }
}
