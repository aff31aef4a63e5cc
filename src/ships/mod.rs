mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use repo::ShipStore;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::ship_routes())
}
