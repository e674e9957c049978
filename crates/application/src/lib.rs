//! Sessiongate Application - Session core, ports and use cases
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for storage, navigation and the transport)
//! - The session store, token sources and the session gate
//! - Use case orchestration for the session lifecycle
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{
    FallbackTokenSource, GateState, Invalidation, RequestAugmenter, ResponseClassifier,
    SessionGate, SessionInvalidator, TokenSource, TokenStore,
};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    AuthGateway, DerivedDataCache, Interceptor, Navigator, SnapshotStorage, Transport,
    TransportError,
};
pub use use_cases::{
    AutoLogin, AutoLoginOutcome, Login, Logout, Register, Revalidation, RevalidateSession,
    UpdateProfile,
};
