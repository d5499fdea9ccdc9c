//! Generic synchronisation engine and the controllers built on it.
//!
//! One engine serves every entity. Per-entity behaviour comes from a
//! [`CollectionBinding`] or [`RecordBinding`] plus [`SyncOptions`].

mod binding;
mod collection;
mod engine;
mod options;
mod record;
mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use binding::{CollectionBinding, RecordBinding};
pub use collection::{CollectionController, Rows};
pub use options::{MutationPolicy, OrderingPolicy, SyncOptions};
pub use record::RecordController;
pub use state::{ObservableState, Ticket};
