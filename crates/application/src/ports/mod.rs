//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and the external
//! collaborators: persistence, navigation, the HTTP transport and the
//! remote auto-login endpoint. Adapters live in the infrastructure crate.

mod auto_login;
mod cache;
mod clock;
mod gateway;
mod navigator;
mod storage;
mod transport;

pub use auto_login::{AutoLoginConfig, AutoLoginSource};
pub use cache::DerivedDataCache;
pub use clock::Clock;
pub use gateway::{AuthGateway, LoginCredentials, ProfileChanges, Registration};
pub use navigator::Navigator;
pub use storage::{SnapshotStorage, StorageError};
pub use transport::{ErrorResponse, Interceptor, Transport, TransportError};
