//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A session was constructed without a usable token.
    #[error("session token must not be empty")]
    EmptyToken,

    /// A session was constructed without a username.
    #[error("session username must not be empty")]
    EmptyUsername,

    /// The action name is not one the capability evaluator knows.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The resource kind is not one the capability evaluator knows.
    #[error("unknown resource kind: {0}")]
    UnknownResource(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A persisted snapshot could not be decoded.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
