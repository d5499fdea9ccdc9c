//! Named GraphQL operations.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::UserIdentity;

/// A named query or mutation with its JSON variables.
///
/// The backend expects the session identity as ordinary arguments rather than
/// transport headers, so [`Operation::scoped`] injects `userId` and `token`.
///
/// # Examples
/// ```
/// use client::domain::Operation;
///
/// let op = Operation::new("TrendingSkills", "query TrendingSkills { trendingSkills { id } }")
///     .with_variable("limit", 10);
/// assert_eq!(op.name(), "TrendingSkills");
/// assert_eq!(op.variables()["limit"], 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    name: String,
    document: String,
    variables: Map<String, Value>,
}

impl Operation {
    /// Create an operation without variables.
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
            variables: Map::new(),
        }
    }

    /// Create an operation carrying the session identity arguments.
    pub fn scoped(
        name: impl Into<String>,
        document: impl Into<String>,
        identity: &UserIdentity,
    ) -> Self {
        Self::new(name, document)
            .with_variable("userId", identity.id().as_ref())
            .with_variable("token", identity.token().expose())
    }

    /// Add or replace one variable.
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Operation name, also sent as `operationName`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// GraphQL document text.
    #[must_use]
    pub fn document(&self) -> &str {
        self.document.as_str()
    }

    /// Variables object.
    #[must_use]
    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}
