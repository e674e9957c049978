//! Remote auto-login configuration port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::TransportError;

/// Remote auto-login settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLoginConfig {
    /// Whether auto-login should run.
    #[serde(default)]
    pub auto_login: bool,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
}

impl AutoLoginConfig {
    /// The reset value written back after a successful auto-login.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns true when enabled and both credentials are present.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.auto_login && !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Best-effort source of auto-login credentials.
#[async_trait]
pub trait AutoLoginSource: Send + Sync {
    /// Fetches the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be read or decoded.
    async fn fetch(&self) -> Result<AutoLoginConfig, TransportError>;

    /// Writes [`AutoLoginConfig::disabled`] back to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the update.
    async fn reset(&self) -> Result<(), TransportError>;
}
