//! API transport port and its interception hooks

use async_trait::async_trait;
use serde_json::Value;
use sessiongate_domain::{Normalized, OutboundRequest, ValidationErrors, normalize};
use thiserror::Error;

/// An error response as seen by the on-error hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// Request path relative to the API base.
    pub path: String,
    /// Response body, normalized once the session gate has seen it.
    pub body: Normalized,
}

impl ErrorResponse {
    /// Wraps a body that has not been normalized yet.
    #[must_use]
    pub fn raw(status: u16, path: impl Into<String>, body: Value) -> Self {
        Self {
            status,
            path: path.into(),
            body: Normalized::Passthrough(body),
        }
    }

    /// Normalizes a passthrough body. Already-normalized bodies are kept.
    #[must_use]
    pub fn normalized(self) -> Self {
        let body = match self.body {
            Normalized::Passthrough(value) => normalize(value),
            validation @ Normalized::Validation(_) => validation,
        };
        Self { body, ..self }
    }

    /// The validation errors carried by the body, if recognised.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationErrors> {
        self.body.validation()
    }
}

/// Errors surfaced by the transport.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status.
    #[error("HTTP {} from {}", .0.status, .0.path)]
    Status(ErrorResponse),

    /// A success response had an unexpected body.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// The HTTP status, for responses that reached the server.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(response) => Some(response.status),
            _ => None,
        }
    }

    /// The error response, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Returns true for failures that never reached the server.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }
}

/// Hooks a transport runs around every call.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Runs before the request is transmitted. Must not fail the request.
    async fn before_send(&self, request: &mut OutboundRequest);

    /// Runs once per error response, before the error reaches the caller.
    fn on_error(&self, request: &OutboundRequest, response: ErrorResponse) -> ErrorResponse;
}

/// Sends JSON API requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`] for non-success responses and a
    /// transient variant when no response was received.
    async fn send(&self, request: OutboundRequest) -> Result<Value, TransportError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalized_recognises_validation_payload() {
        let response = ErrorResponse::raw(422, "/users", json!({"errors": {"email": ["taken"]}}))
            .normalized();
        assert_eq!(response.validation().unwrap().field("email"), ["taken"]);
    }

    #[test]
    fn normalized_keeps_unknown_payload() {
        let body = json!({"message": "boom"});
        let response = ErrorResponse::raw(500, "/tags", body.clone()).normalized();
        assert_eq!(response.body, Normalized::Passthrough(body));
    }

    #[test]
    fn status_and_transience() {
        let error = TransportError::Status(ErrorResponse::raw(401, "/user", Value::Null));
        assert_eq!(error.status(), Some(401));
        assert!(!error.is_transient());
        assert!(TransportError::Timeout { timeout_ms: 10 }.is_transient());
        assert_eq!(error.to_string(), "HTTP 401 from /user");
    }
}
