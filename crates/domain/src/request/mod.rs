//! Outbound API request types

mod method;
mod outbound;

pub use method::HttpMethod;
pub use outbound::{AUTHORIZATION, OutboundRequest};
