//! User endpoints over the API transport.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sessiongate_application::ports::{
    AuthGateway, LoginCredentials, ProfileChanges, Registration, Transport, TransportError,
};
use sessiongate_domain::{OutboundRequest, Session};
use tracing::info;

use super::dto::{UserDto, UserEnvelope};
use crate::serialization::from_value;

/// Login endpoint.
pub const LOGIN_PATH: &str = "/users/login";
/// Registration endpoint.
pub const USERS_PATH: &str = "/users";
/// Current-user endpoint.
pub const CURRENT_USER_PATH: &str = "/user";

/// [`AuthGateway`] backed by the RealWorld-style user API.
pub struct HttpAuthGateway {
    transport: Arc<dyn Transport>,
}

impl HttpAuthGateway {
    /// Creates a gateway sending through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn envelope<T: Serialize>(user: &T) -> Result<Value, TransportError> {
        serde_json::to_value(UserEnvelope { user }).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn session_from(&self, request: OutboundRequest) -> Result<Session, TransportError> {
        let body = self.transport.send(request).await?;
        let envelope: UserEnvelope<UserDto> =
            from_value(body).map_err(|e| TransportError::Decode(e.to_string()))?;
        envelope
            .user
            .into_session()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, TransportError> {
        let body = Self::envelope(credentials)?;
        let session = self.session_from(OutboundRequest::post(LOGIN_PATH, body)).await?;
        info!(username = session.username(), token = %session.token_preview(), "logged in");
        Ok(session)
    }

    async fn register(&self, registration: &Registration) -> Result<Session, TransportError> {
        let body = Self::envelope(registration)?;
        let session = self.session_from(OutboundRequest::post(USERS_PATH, body)).await?;
        info!(username = session.username(), "registered");
        Ok(session)
    }

    async fn current_user(&self) -> Result<Session, TransportError> {
        self.session_from(OutboundRequest::get(CURRENT_USER_PATH)).await
    }

    async fn update_user(&self, changes: &ProfileChanges) -> Result<Session, TransportError> {
        let body = Self::envelope(changes)?;
        self.session_from(OutboundRequest::put(CURRENT_USER_PATH, body)).await
    }
}
