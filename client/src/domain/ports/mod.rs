//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_store;
mod remote_gateway;

#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, CredentialStoreError, InMemoryCredentialStore};
#[cfg(test)]
pub use remote_gateway::MockRemoteGateway;
pub use remote_gateway::{FixtureRemoteGateway, GatewayError, RemoteGateway};
