//! Shared helpers for controller integration tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use client::domain::ports::{GatewayError, RemoteGateway};
use client::domain::{Operation, UserIdentity};
use serde_json::Value;
use tokio::sync::oneshot;

type Reply = Result<Value, GatewayError>;

/// Gateway whose calls stay pending until the test resolves them.
///
/// Calls are numbered from zero in the order they reach the gateway.
#[derive(Default)]
pub struct DeferredGateway {
    calls: Mutex<Vec<(String, Option<oneshot::Sender<Reply>>)>>,
}

impl DeferredGateway {
    /// Names of the operations received so far.
    pub fn call_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Complete call `index` with `reply`.
    pub fn resolve(&self, index: usize, reply: Reply) {
        let sender = self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(index)
            .and_then(|(_, sender)| sender.take())
            .unwrap_or_else(|| panic!("call {index} is not pending"));
        sender
            .send(reply)
            .unwrap_or_else(|_| panic!("call {index} was abandoned"));
    }
}

#[async_trait]
impl RemoteGateway for DeferredGateway {
    async fn execute(&self, operation: &Operation) -> Reply {
        let (sender, receiver) = oneshot::channel();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((operation.name().to_owned(), Some(sender)));
        receiver
            .await
            .unwrap_or_else(|_| Err(GatewayError::transport("request abandoned")))
    }
}

/// Identity used by authenticated scenarios.
pub fn identity() -> UserIdentity {
    UserIdentity::try_from_parts("u-1", "tok-1").expect("identity")
}
