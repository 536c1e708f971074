pub mod dto;
pub mod expiry;
pub mod handlers;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::freshness_routes())
        .merge(handlers::listing_routes())
}
