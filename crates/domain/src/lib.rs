//! Sessiongate Domain - Core session and authorization types
//!
//! This crate defines the pure model behind the client-side session gate:
//! sessions and their persisted snapshots, the auth-failure rule table,
//! the public-path allowlist, validation-error normalization and the
//! capability evaluator. All types here are pure Rust with no I/O.

pub mod capability;
pub mod classification;
pub mod error;
pub mod navigation;
pub mod request;
pub mod session;
pub mod snapshot;
pub mod validation;

pub use capability::{Action, CapabilityContext, ResourceKind, can_perform};
pub use classification::{AUTH_FAILURE_RULES, AuthFailureRule, Classification, UrlCondition, classify};
pub use error::{DomainError, DomainResult};
pub use navigation::{DEFAULT_PUBLIC_PATHS, LOGIN_PATH, PublicPaths};
pub use request::{AUTHORIZATION, HttpMethod, OutboundRequest};
pub use session::{Session, SessionRecord, token_preview};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use validation::{GENERAL_FIELD, Normalized, ValidationErrors, normalize};
