//! Reqwest-backed GraphQL gateway adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and decoding the GraphQL envelope. A non-empty
//! `errors` list wins over any `data` the server also returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::dto::{GraphQlRequestDto, GraphQlResponseDto};
use crate::config::DEFAULT_USER_AGENT;
use crate::domain::Operation;
use crate::domain::ports::{GatewayError, RemoteGateway};

/// Gateway adapter that POSTs GraphQL operations to one endpoint.
pub struct GraphQlHttpGateway {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl GraphQlHttpGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(endpoint, timeout, DEFAULT_USER_AGENT)
    }

    /// Build an adapter that identifies itself with `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(
        endpoint: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            user_agent: user_agent.into(),
        })
    }

    /// Endpoint every operation is sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteGateway for GraphQlHttpGateway {
    async fn execute(&self, operation: &Operation) -> Result<Value, GatewayError> {
        debug!(operation = operation.name(), endpoint = %self.endpoint, "sending GraphQL operation");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GraphQlRequestDto::from(operation))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        decode_response(status, body.as_ref())
    }
}

/// Map one HTTP exchange to the `data` payload or a gateway error.
///
/// GraphQL servers often report resolver errors with a non-2xx status, so a
/// decodable envelope carrying `errors` is preferred over the status line.
fn decode_response(status: StatusCode, body: &[u8]) -> Result<Value, GatewayError> {
    let envelope = serde_json::from_slice::<GraphQlResponseDto>(body);
    if let Ok(decoded) = &envelope {
        if let Some(message) = decoded.first_error() {
            return Err(GatewayError::server(message));
        }
    }
    if !status.is_success() {
        return Err(map_status_error(status, body));
    }

    envelope
        .map(|decoded| decoded.data)
        .map_err(|error| GatewayError::decode(format!("invalid GraphQL response: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    GatewayError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    GatewayError::transport(message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
