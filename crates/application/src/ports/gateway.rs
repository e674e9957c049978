//! Authentication API port

use async_trait::async_trait;
use serde::Serialize;
use sessiongate_domain::Session;

use super::TransportError;

/// Email/password login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginCredentials {
    /// Creates login credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Account registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Profile update payload. Unset fields are left unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileChanges {
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Server endpoints that create or refresh a session.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns the transport error, with validation errors normalized.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, TransportError>;

    /// Creates an account and returns its session.
    ///
    /// # Errors
    ///
    /// Returns the transport error, with validation errors normalized.
    async fn register(&self, registration: &Registration) -> Result<Session, TransportError>;

    /// Fetches the user behind the current token.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    async fn current_user(&self) -> Result<Session, TransportError>;

    /// Applies profile changes and returns the updated session.
    ///
    /// # Errors
    ///
    /// Returns the transport error, with validation errors normalized.
    async fn update_user(&self, changes: &ProfileChanges) -> Result<Session, TransportError>;
}
