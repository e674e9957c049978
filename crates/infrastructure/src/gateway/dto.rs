//! Wire shapes of the user endpoints.

use serde::{Deserialize, Serialize};
use sessiongate_domain::{DomainResult, Session};

/// `{"user": {...}}` envelope used by every user endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope<T> {
    /// Wrapped payload.
    pub user: T,
}

/// User returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    /// Bearer token.
    pub token: String,
    /// Username.
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Bio, `null` when unset.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar URL, `null` when unset.
    #[serde(default)]
    pub image: Option<String>,
}

impl UserDto {
    /// Converts to a [`Session`].
    ///
    /// # Errors
    ///
    /// Fails when the token or username is empty.
    pub fn into_session(self) -> DomainResult<Session> {
        Ok(Session::new(self.token, self.username, self.email)?
            .with_bio(self.bio.unwrap_or_default())
            .with_image(self.image.unwrap_or_default()))
    }
}
