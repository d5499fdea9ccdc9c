//! Career guidance client: data-synchronisation core and adapters.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
