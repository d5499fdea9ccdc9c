//! Domain primitives, ports, and the synchronisation engine.
//!
//! Purpose: define strongly typed domain entities used by inbound adapters
//! (CLI) and outbound adapters (GraphQL gateway, credential files). Nothing
//! here knows about HTTP, the filesystem, or argument parsing.

pub mod auth;
pub mod entities;
pub mod entity;
pub mod error;
pub mod identity;
pub mod operation;
pub mod ports;
pub(crate) mod projection;
pub mod remote_result;
pub mod session;
pub mod sync;

pub use self::auth::{CredentialsValidationError, LoginCredentials, SignupDetails};
pub use self::entity::{Entity, EntityId};
pub use self::error::{ErrorCode, SyncError};
pub use self::identity::{AuthToken, IdentityValidationError, UserId, UserIdentity};
pub use self::operation::Operation;
pub use self::remote_result::RemoteResult;
pub use self::session::{SessionContext, SessionService};
