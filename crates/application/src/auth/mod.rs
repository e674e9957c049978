//! Session and authorization gate.
//!
//! This module provides:
//! - The session store with snapshot rehydration and change subscription
//! - Ranked token sources (store first, snapshot fallback)
//! - The one-shot request augmenter and the response classifier
//! - [`SessionGate`], which bundles both behind the transport hooks

mod augmenter;
mod classifier;
mod gate;
mod token_source;
mod token_store;

pub use augmenter::{GateState, RequestAugmenter};
pub use classifier::{ClassifierOutcome, Invalidation, ResponseClassifier, SessionInvalidator};
pub use gate::SessionGate;
pub use token_source::{FallbackTokenSource, SnapshotTokenSource, StoreTokenSource, TokenSource};
pub use token_store::{DEFAULT_SNAPSHOT_KEY, TokenStore};
