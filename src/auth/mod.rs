use crate::state::AppState;
use axum::Router;

mod claims;
pub mod credentials;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
mod password;

pub use credentials::{CredentialVerifier, StaticCredentials};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
