//! Application use cases (session lifecycle orchestration).

mod auto_login;
mod login;
mod logout;
mod register;
mod revalidate_session;
mod update_profile;

pub use auto_login::*;
pub use login::*;
pub use logout::*;
pub use register::*;
pub use revalidate_session::*;
pub use update_profile::*;
