//! Observable state exposed by every controller.

use serde::Serialize;

use crate::domain::SyncError;

/// Tagged state of a remote-backed value.
///
/// Exactly one variant is active at a time and consumers are expected to
/// match all three. Controllers start in [`RemoteResult::Loading`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum RemoteResult<T> {
    /// A request is outstanding or nothing has been loaded yet.
    Loading,
    /// The latest applied result.
    Success(T),
    /// The latest applied failure, as a user-facing message.
    Error(String),
}

impl<T> Default for RemoteResult<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> RemoteResult<T> {
    /// Whether the state is [`RemoteResult::Loading`].
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Borrow the success payload, if any.
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Consume the state and return the success payload, if any.
    #[must_use]
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Map the success payload, leaving other variants untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteResult<U> {
        match self {
            Self::Loading => RemoteResult::Loading,
            Self::Success(value) => RemoteResult::Success(f(value)),
            Self::Error(message) => RemoteResult::Error(message),
        }
    }
}

impl<T> From<Result<T, SyncError>> for RemoteResult<T> {
    fn from(value: Result<T, SyncError>) -> Self {
        match value {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Error(error.message().to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn default_state_is_loading() {
        let state = RemoteResult::<Vec<u8>>::default();
        assert!(state.is_loading());
        assert!(state.success().is_none());
        assert!(state.error_message().is_none());
    }

    #[rstest]
    fn errors_keep_only_the_message() {
        let state: RemoteResult<()> = Err(SyncError::server("boom")).into();
        assert_eq!(state, RemoteResult::Error("boom".to_owned()));
    }

    #[rstest]
    fn map_only_touches_success() {
        assert_eq!(RemoteResult::Success(2).map(|v| v * 2), RemoteResult::Success(4));
        assert_eq!(
            RemoteResult::<i32>::Error("x".to_owned()).map(|v| v * 2),
            RemoteResult::Error("x".to_owned())
        );
    }

    #[rstest]
    #[case(RemoteResult::Loading, json!({"status": "loading"}))]
    #[case(RemoteResult::Success(vec![1, 2]), json!({"status": "success", "value": [1, 2]}))]
    #[case(RemoteResult::Error("nope".to_owned()), json!({"status": "error", "value": "nope"}))]
    fn serialises_with_status_tag(
        #[case] state: RemoteResult<Vec<u8>>,
        #[case] expected: serde_json::Value,
    ) {
        assert_eq!(serde_json::to_value(&state).expect("serialise"), expected);
    }
}
