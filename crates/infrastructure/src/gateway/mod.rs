//! HTTP gateways for the auth endpoints.

mod dto;
mod http_auth_gateway;
mod http_auto_login;

pub use dto::{UserDto, UserEnvelope};
pub use http_auth_gateway::{CURRENT_USER_PATH, HttpAuthGateway, LOGIN_PATH, USERS_PATH};
pub use http_auto_login::{DEFAULT_AUTO_LOGIN_PATH, HttpAutoLoginSource};
