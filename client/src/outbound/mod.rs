//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **graphql**: reqwest-backed `RemoteGateway` speaking GraphQL over HTTP
//! - **credentials**: cap-std backed `CredentialStore` persisting the session
//!   identity as a small JSON file
//!
//! Adapters are thin translators between domain types and wire or file
//! representations. They contain no business logic.

pub mod credentials;
pub mod graphql;
