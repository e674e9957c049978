//! Sessiongate - session and authorization gate for API clients
//!
//! Wires the application layer to its adapters and exposes the
//! bootstrap sequence shared by the CLI and integration tests.

pub mod bootstrap;
pub mod cli;
pub mod commands;

pub use bootstrap::{BootstrapReport, Runtime};
