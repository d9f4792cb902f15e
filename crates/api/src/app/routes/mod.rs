use axum::Router;

pub mod contracts;
pub mod inventory;
pub mod system;

/// Router for every lot and contract endpoint.
pub fn router() -> Router {
    Router::new()
        .merge(inventory::router())
        .merge(contracts::router())
}
