//! GraphQL outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `RemoteGateway`
//! port.

mod dto;
mod http_gateway;

pub use http_gateway::GraphQlHttpGateway;
