//! Driven port for executing GraphQL operations against the backend.
//!
//! Adapters own transport details; the port only promises the `data` member
//! of a successful envelope or a gateway error carrying a human-readable
//! message. Nothing is retried: one failed attempt surfaces immediately.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{Operation, SyncError};

define_port_error! {
    /// Errors raised by remote gateway adapters.
    ///
    /// Messages are rendered verbatim because they surface unchanged in
    /// `RemoteResult::Error`.
    pub enum GatewayError {
        /// Network or HTTP failure before a GraphQL envelope was available.
        Transport { message: String } => "{message}",
        /// First message of a non-empty `errors` list.
        Server { message: String } => "{message}",
        /// The response body was not a GraphQL envelope.
        Decode { message: String } => "{message}",
    }
}

impl GatewayError {
    /// Message carried by any variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message } | Self::Server { message } | Self::Decode { message } => {
                message.as_str()
            }
        }
    }
}

impl From<GatewayError> for SyncError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Transport { message } => Self::transport(message),
            GatewayError::Server { message } => Self::server(message),
            GatewayError::Decode { message } => Self::malformed_payload(message),
        }
    }
}

/// Port for running one named operation and returning its `data` payload.
///
/// A successful call may still yield JSON `null` (or a `data` object whose
/// expected member is `null`); interpreting that as "not found" is the
/// projection layer's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Execute `operation` once.
    async fn execute(&self, operation: &Operation) -> Result<Value, GatewayError>;
}

/// In-memory gateway answering by operation name.
///
/// Responses are sticky: the same answer is returned until it is replaced
/// with [`FixtureRemoteGateway::respond`]. Every call is recorded.
#[derive(Debug, Default)]
pub struct FixtureRemoteGateway {
    responses: Mutex<HashMap<String, Result<Value, GatewayError>>>,
    calls: Mutex<Vec<Operation>>,
}

impl FixtureRemoteGateway {
    /// Create a gateway with no canned responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FixtureRemoteGateway::respond`].
    #[must_use]
    pub fn with_response(
        self,
        operation_name: impl Into<String>,
        response: Result<Value, GatewayError>,
    ) -> Self {
        self.respond(operation_name, response);
        self
    }

    /// Install or replace the answer for `operation_name`.
    pub fn respond(&self, operation_name: impl Into<String>, response: Result<Value, GatewayError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation_name.into(), response);
    }

    /// Every operation executed so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Operation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls made for `operation_name`.
    #[must_use]
    pub fn call_count(&self, operation_name: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|operation| operation.name() == operation_name)
            .count()
    }
}

#[async_trait]
impl RemoteGateway for FixtureRemoteGateway {
    async fn execute(&self, operation: &Operation) -> Result<Value, GatewayError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(operation.clone());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation.name())
            .cloned()
            .unwrap_or_else(|| {
                Err(GatewayError::server(format!(
                    "no fixture response for {}",
                    operation.name()
                )))
            })
    }
}
