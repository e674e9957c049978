//! Auto-login config fetched from a static JSON document.

use std::sync::Arc;

use async_trait::async_trait;
use sessiongate_application::ports::{AutoLoginConfig, AutoLoginSource, Transport, TransportError};
use sessiongate_domain::OutboundRequest;

use crate::serialization::from_value;

/// Default location of the auto-login document.
pub const DEFAULT_AUTO_LOGIN_PATH: &str = "/auto-login.json";

/// Reads and resets the auto-login document at a fixed path or URL.
pub struct HttpAutoLoginSource {
    transport: Arc<dyn Transport>,
    location: String,
}

impl HttpAutoLoginSource {
    /// Creates a source for the document at `location`, either a path
    /// relative to the API base or an absolute URL.
    pub fn new(transport: Arc<dyn Transport>, location: impl Into<String>) -> Self {
        Self {
            transport,
            location: location.into(),
        }
    }

    /// Where the document lives.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

#[async_trait]
impl AutoLoginSource for HttpAutoLoginSource {
    async fn fetch(&self) -> Result<AutoLoginConfig, TransportError> {
        let body = self
            .transport
            .send(OutboundRequest::get(self.location.clone()))
            .await?;
        from_value(body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn reset(&self) -> Result<(), TransportError> {
        let body = serde_json::to_value(AutoLoginConfig::disabled())
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        self.transport
            .send(OutboundRequest::put(self.location.clone(), body))
            .await?;
        Ok(())
    }
}
