//! Authenticated session model.
//!
//! A [`Session`] is either fully present with a non-empty token or absent
//! altogether (`Option<Session>::None`). There is no half-initialised state:
//! deserialisation goes through [`SessionRecord`] and rejects empty tokens.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// The authenticated identity plus bearer token held by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct Session {
    token: String,
    username: String,
    email: String,
    bio: String,
    image: String,
}

impl Session {
    /// Creates a session, rejecting an empty token or username.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyToken`] or [`DomainError::EmptyUsername`].
    pub fn new(
        token: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Self> {
        let token = token.into();
        let username = username.into();
        if token.trim().is_empty() {
            return Err(DomainError::EmptyToken);
        }
        if username.trim().is_empty() {
            return Err(DomainError::EmptyUsername);
        }
        Ok(Self {
            token,
            username,
            email: email.into(),
            bio: String::new(),
            image: String::new(),
        })
    }

    /// Sets the profile bio.
    #[must_use]
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Sets the avatar image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// The bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The username, used for ownership checks.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The account email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Profile bio, empty when unset.
    #[must_use]
    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Avatar URL, empty when unset.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Returns a log-safe preview of the token.
    #[must_use]
    pub fn token_preview(&self) -> String {
        token_preview(&self.token)
    }
}

/// Get a preview of a token (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.chars().count() > 12 {
        let head: String = token.chars().take(8).collect();
        format!("{head}...")
    } else {
        "***".to_string()
    }
}

/// Wire shape of a session. Optional display fields default to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Bearer token; may be missing or empty on malformed input.
    #[serde(default)]
    pub token: Option<String>,
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Bio, `null` on the wire is accepted.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar URL, `null` on the wire is accepted.
    #[serde(default)]
    pub image: Option<String>,
}

impl TryFrom<SessionRecord> for Session {
    type Error = DomainError;

    fn try_from(record: SessionRecord) -> DomainResult<Self> {
        let token = record.token.ok_or(DomainError::EmptyToken)?;
        Ok(Self::new(token, record.username, record.email)?
            .with_bio(record.bio.unwrap_or_default())
            .with_image(record.image.unwrap_or_default()))
    }
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        Self {
            token: Some(session.token),
            username: session.username,
            email: session.email,
            bio: Some(session.bio),
            image: Some(session.image),
        }
    }
}
