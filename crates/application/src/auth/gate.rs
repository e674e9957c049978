//! The session gate handed to the transport.
//!
//! Created by the application bootstrap and passed explicitly to the
//! transport as an [`Interceptor`]. Its lifecycle is `created → armed`;
//! arming happens once, after the store has rehydrated.

use std::sync::Arc;

use async_trait::async_trait;
use sessiongate_domain::OutboundRequest;
use tracing::debug;

use super::augmenter::{GateState, RequestAugmenter};
use super::classifier::{ClassifierOutcome, ResponseClassifier, SessionInvalidator};
use super::token_source::{FallbackTokenSource, TokenSource};
use super::token_store::TokenStore;
use crate::ports::{ErrorResponse, Interceptor};

/// Request augmenter plus response classifier behind one interceptor.
pub struct SessionGate {
    augmenter: RequestAugmenter,
    classifier: ResponseClassifier,
}

impl SessionGate {
    /// Creates an unarmed gate that invalidates through `invalidator`.
    #[must_use]
    pub fn new(invalidator: impl Into<Arc<SessionInvalidator>>) -> Self {
        Self {
            augmenter: RequestAugmenter::new(),
            classifier: ResponseClassifier::new(invalidator),
        }
    }

    /// Arms the gate with `source`. Later calls are no-ops.
    ///
    /// Callers must not arm before the store has rehydrated; see
    /// [`SessionGate::arm_when_bootstrapped`].
    pub fn attach(&self, source: Arc<dyn TokenSource>) -> bool {
        self.augmenter.attach(source)
    }

    /// Waits for `store` to finish rehydrating, then arms the gate with the
    /// standard store-then-snapshot token chain.
    pub async fn arm_when_bootstrapped(&self, store: &TokenStore) -> bool {
        if !store.is_bootstrapped() {
            debug!("deferring gate arming until rehydration completes");
            store.wait_bootstrapped().await;
        }
        let chain = FallbackTokenSource::for_store(store);
        debug!(sources = ?chain.names(), "arming gate");
        self.attach(Arc::new(chain))
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.augmenter.state()
    }

    /// Classifies an error response, invalidating the session when needed.
    pub fn classify(&self, status: u16, request_url: &str) -> ClassifierOutcome {
        self.classifier.handle(status, request_url)
    }

    /// The invalidator shared with use cases that detect dead sessions.
    #[must_use]
    pub const fn invalidator(&self) -> &Arc<SessionInvalidator> {
        self.classifier.invalidator()
    }
}

#[async_trait]
impl Interceptor for SessionGate {
    async fn before_send(&self, request: &mut OutboundRequest) {
        self.augmenter.augment(request).await;
    }

    fn on_error(&self, request: &OutboundRequest, response: ErrorResponse) -> ErrorResponse {
        self.classifier.handle(response.status, &request.path);
        response.normalized()
    }
}
