//! Sessiongate Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod cache;
pub mod configuration;
pub mod gateway;
pub mod persistence;
pub mod serialization;

pub use adapters::{InMemoryNavigator, ReqwestTransport, SystemClock};
pub use cache::MokaResponseCache;
pub use configuration::{ConfigError, GateConfig};
pub use gateway::{HttpAuthGateway, HttpAutoLoginSource};
pub use persistence::{FileSnapshotStorage, InMemorySnapshotStorage};
pub use serialization::{SerializationError, from_value, to_json_stable};
