//! Adapter implementations for application ports.

mod navigator;
mod reqwest_transport;
mod system_clock;

pub use navigator::InMemoryNavigator;
pub use reqwest_transport::{DEFAULT_TIMEOUT, ReqwestTransport};
pub use system_clock::SystemClock;
