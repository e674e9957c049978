//! JSON helpers for wire DTOs and human-readable output.
//!
//! Pretty output is deterministic: 2-space indentation, trailing newline,
//! and key order taken from the source types.

mod json;

pub use json::*;
