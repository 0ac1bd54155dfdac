pub mod dto;
mod handlers;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::entry_routes())
        .merge(handlers::maintenance_routes())
}
