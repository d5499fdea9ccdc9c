//! Session identity model.
//!
//! A [`UserIdentity`] is resolved once when a session starts and never
//! changes afterwards. Every scoped remote call reads it, so the constructors
//! here are the only place identity invariants are checked.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation errors returned by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// The user id was empty.
    EmptyUserId,
    /// The user id carried leading or trailing whitespace.
    PaddedUserId,
    /// The auth token was empty once trimmed.
    EmptyToken,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::PaddedUserId => write!(f, "user id must not contain surrounding whitespace"),
            Self::EmptyToken => write!(f, "auth token must not be empty"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Server-assigned user identifier.
///
/// The backend issues opaque string ids, so the only structural rules are
/// non-emptiness and the absence of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentityValidationError::EmptyUserId);
        }
        if id.trim() != id {
            return Err(IdentityValidationError::PaddedUserId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque session token passed as an argument on every scoped operation.
///
/// The token is zeroised on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Validate and construct an [`AuthToken`].
    pub fn new(token: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(IdentityValidationError::EmptyToken);
        }
        Ok(Self(token))
    }

    /// Raw token value for building operation arguments.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// The active user identity for a session.
///
/// ## Invariants
/// - `id` is a validated [`UserId`].
/// - `token` is non-empty.
///
/// # Examples
/// ```
/// use client::domain::UserIdentity;
///
/// let identity = UserIdentity::try_from_parts("u-42", "secret").unwrap();
/// assert_eq!(identity.id().as_ref(), "u-42");
/// assert!(!format!("{identity:?}").contains("secret"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    id: UserId,
    token: AuthToken,
}

impl UserIdentity {
    /// Build an identity from validated parts.
    #[must_use]
    pub fn new(id: UserId, token: AuthToken) -> Self {
        Self { id, token }
    }

    /// Fallible constructor validating both raw parts.
    pub fn try_from_parts(
        id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, IdentityValidationError> {
        Ok(Self::new(UserId::new(id)?, AuthToken::new(token)?))
    }

    /// Server-assigned user id.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Session token.
    #[must_use]
    pub fn token(&self) -> &AuthToken {
        &self.token
    }
}
