//! Persisted session snapshot.
//!
//! The snapshot is the serialized copy of session state that survives a
//! process restart. Decoding is tolerant in one direction only: anything
//! that does not yield a valid [`Session`] is reported as an error so the
//! caller can treat it as "no session".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::session::Session;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized copy of the session written by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// The session at write time, `None` after logout.
    pub session: Option<Session>,
    /// When the snapshot was written.
    pub written_at: DateTime<Utc>,
}

impl Snapshot {
    /// Creates a snapshot of the given session state.
    #[must_use]
    pub const fn new(session: Option<Session>, written_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            session,
            written_at,
        }
    }

    /// Decodes a snapshot from its stored string form.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSnapshot`] when the payload is not valid
    /// JSON, has an unknown version, or contains a session without a token.
    pub fn decode(raw: &str) -> DomainResult<Self> {
        let snapshot: Self = serde_json::from_str(raw)
            .map_err(|e| DomainError::InvalidSnapshot(e.to_string()))?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(DomainError::InvalidSnapshot(format!(
                "unsupported version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }

    /// Encodes the snapshot to its stored string form.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSnapshot`] if serialization fails.
    pub fn encode(&self) -> DomainResult<String> {
        serde_json::to_string(self).map_err(|e| DomainError::InvalidSnapshot(e.to_string()))
    }

    /// The token held by this snapshot, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(Session::token)
    }
}
