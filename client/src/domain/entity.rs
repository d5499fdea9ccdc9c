//! Generic entity wrapper used by collection controllers.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Identity of a row in a managed collection.
///
/// Server-confirmed and client-temporary identities never compare equal, so
/// a row added before remote confirmation can always be told apart from the
/// canonical row that replaces it after a refetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntityId {
    /// Identity assigned by the server.
    Server(String),
    /// Identity assigned locally to a row the server has not confirmed.
    Temporary(Uuid),
}

impl EntityId {
    /// Wrap a server-assigned id.
    pub fn server(id: impl Into<String>) -> Self {
        Self::Server(id.into())
    }

    /// Mint a fresh temporary id.
    #[must_use]
    pub fn temporary() -> Self {
        Self::Temporary(Uuid::new_v4())
    }

    /// Whether the id is client-temporary.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    /// The server id, when confirmed.
    #[must_use]
    pub fn as_server(&self) -> Option<&str> {
        match self {
            Self::Server(id) => Some(id.as_str()),
            Self::Temporary(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => f.write_str(id),
            Self::Temporary(uuid) => write!(f, "tmp-{uuid}"),
        }
    }
}

/// A row in a managed collection: identity, fields, and whether local edits
/// are waiting for an explicit submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity<F> {
    id: EntityId,
    fields: F,
    modified: bool,
}

impl<F> Entity<F> {
    /// A row exactly as the server reported it.
    pub fn confirmed(id: impl Into<String>, fields: F) -> Self {
        Self {
            id: EntityId::server(id),
            fields,
            modified: false,
        }
    }

    /// A new local row with a temporary identity.
    pub fn draft(fields: F) -> Self {
        Self {
            id: EntityId::temporary(),
            fields,
            modified: false,
        }
    }

    /// Row identity.
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    /// Row fields.
    pub const fn fields(&self) -> &F {
        &self.fields
    }

    /// Whether the row carries local edits that `submit` must persist.
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Consume the row and return its fields.
    pub fn into_fields(self) -> F {
        self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    pub(crate) fn replace_fields(&mut self, fields: F) {
        self.fields = fields;
        if !self.id.is_temporary() {
            self.modified = true;
        }
    }
}
