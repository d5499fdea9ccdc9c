//! DTOs for the GraphQL request and response envelopes.
//!
//! The adapter serialises requests from domain `Operation`s and decodes
//! responses into these envelopes before handing `data` back to the domain.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::Operation;

const FALLBACK_SERVER_MESSAGE: &str = "The server reported an error.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphQlRequestDto<'a> {
    pub(super) operation_name: &'a str,
    pub(super) query: &'a str,
    pub(super) variables: &'a Map<String, Value>,
}

impl<'a> From<&'a Operation> for GraphQlRequestDto<'a> {
    fn from(operation: &'a Operation) -> Self {
        Self {
            operation_name: operation.name(),
            query: operation.document(),
            variables: operation.variables(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlResponseDto {
    #[serde(default)]
    pub(super) data: Value,
    #[serde(default)]
    pub(super) errors: Option<Vec<GraphQlErrorDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlErrorDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl GraphQlResponseDto {
    /// First server-reported message, when the `errors` list is non-empty.
    pub(super) fn first_error(&self) -> Option<String> {
        let first = self.errors.as_ref()?.first()?;
        Some(
            first
                .message
                .as_deref()
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .unwrap_or(FALLBACK_SERVER_MESSAGE)
                .to_owned(),
        )
    }
}
