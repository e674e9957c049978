//! One-shot bearer token injection.

use std::sync::{Arc, OnceLock};

use sessiongate_domain::{AUTHORIZATION, OutboundRequest};
use tracing::{debug, warn};

use super::token_source::TokenSource;

/// Lifecycle of the augmenter: `Created` until the first attach, then
/// `Armed` for the rest of its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No token source attached yet; requests pass through unmodified.
    Created,
    /// A token source is attached.
    Armed,
}

/// Adds `Authorization: Bearer <token>` to outbound requests once armed.
///
/// The attachment slot is set synchronously, so concurrent callers always
/// observe either "unarmed" or "armed with the first source".
#[derive(Default)]
pub struct RequestAugmenter {
    source: OnceLock<Arc<dyn TokenSource>>,
}

impl RequestAugmenter {
    /// Creates an unarmed augmenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the augmenter with `source`. Only the first call has an effect.
    ///
    /// Returns true if this call armed it.
    pub fn attach(&self, source: Arc<dyn TokenSource>) -> bool {
        let name = source.name();
        let armed = self.source.set(source).is_ok();
        if armed {
            debug!(source = name, "request augmenter armed");
        } else {
            debug!(source = name, "request augmenter already armed; attach ignored");
        }
        armed
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GateState {
        if self.source.get().is_some() {
            GateState::Armed
        } else {
            GateState::Created
        }
    }

    /// Returns true once a source is attached.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state() == GateState::Armed
    }

    /// Sets the bearer header when armed and a token resolves. Never fails:
    /// source errors leave the request unmodified.
    pub async fn augment(&self, request: &mut OutboundRequest) {
        let Some(source) = self.source.get() else {
            return;
        };

        match source.token().await {
            Ok(Some(token)) if !token.is_empty() => {
                request.set_header(AUTHORIZATION, format!("Bearer {token}"));
            }
            Ok(_) => {}
            Err(e) => warn!(
                request_id = %request.id,
                error = %e,
                "token resolution failed; sending request without credentials"
            ),
        }
    }
}

impl std::fmt::Debug for RequestAugmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAugmenter")
            .field("state", &self.state())
            .finish()
    }
}
