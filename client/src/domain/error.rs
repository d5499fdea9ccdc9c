//! Domain-level error types.
//!
//! Every failure a controller can observe collapses into a [`SyncError`]. The
//! presentation layer only ever sees the message inside
//! `RemoteResult::Error`, so `Display` renders the bare message and the
//! [`ErrorCode`] stays available to callers that want to branch on it.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The network round trip failed before a GraphQL envelope arrived.
    Transport,
    /// The server answered with a non-empty `errors` list.
    Server,
    /// The call succeeded but the expected entity was absent.
    NotFound,
    /// No user identity is available for a scoped call.
    NotLoggedIn,
    /// The payload was present but structurally unusable.
    MalformedPayload,
    /// The entity does not support the requested mutation.
    Unsupported,
    /// A mutation is already in flight and the in-flight guard is enabled.
    Busy,
    /// The caller asked for something the local state cannot satisfy.
    InvalidRequest,
    /// The local credential store failed.
    Storage,
    /// A later request settled first, so this result was never shown.
    Superseded,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank message.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Transport => "Network request failed.",
            Self::Server => "The server reported an error.",
            Self::NotFound => "Not found",
            Self::NotLoggedIn => "User not logged in.",
            Self::MalformedPayload => "The server returned a malformed payload.",
            Self::Unsupported => "Operation not supported.",
            Self::Busy => "Another request is already in progress.",
            Self::InvalidRequest => "Invalid request.",
            Self::Storage => "Local credential storage failed.",
            Self::Superseded => "A newer request replaced this result.",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never blank: constructors substitute
///   [`ErrorCode::default_message`] when given whitespace-only input, because
///   server-reported messages are outside our control.
///
/// # Examples
/// ```
/// use client::domain::{ErrorCode, SyncError};
///
/// let err = SyncError::not_found("User not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "User not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncError {
    code: ErrorCode,
    message: String,
}

impl SyncError {
    /// Create a new error, falling back to the code's default message when
    /// `message` is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.default_message().to_owned()
        } else {
            message
        };
        Self { code, message }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message surfaced through `RemoteResult::Error`.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Convenience constructor for [`ErrorCode::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    /// Convenience constructor for [`ErrorCode::Server`].
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Server, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// The precondition failure raised when no identity is available.
    #[must_use]
    pub fn not_logged_in() -> Self {
        Self::new(ErrorCode::NotLoggedIn, ErrorCode::NotLoggedIn.default_message())
    }

    /// Convenience constructor for [`ErrorCode::MalformedPayload`].
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedPayload, message)
    }

    /// Convenience constructor for [`ErrorCode::Unsupported`].
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unsupported, message)
    }

    /// The rejection returned while the in-flight guard is held.
    #[must_use]
    pub fn busy() -> Self {
        Self::new(ErrorCode::Busy, ErrorCode::Busy.default_message())
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, message)
    }

    /// The result of a fetch discarded because a later one was already shown.
    #[must_use]
    pub fn superseded() -> Self {
        Self::new(ErrorCode::Superseded, ErrorCode::Superseded.default_message())
    }

    /// Whether this error only reports a discarded stale result.
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        self.code == ErrorCode::Superseded
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SyncError {}
