//! Route definitions for the service catalog.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/services`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(services::list_active))
}

/// Routes mounted at `/admin/services`.
///
/// ```text
/// GET    /      -> list_all
/// POST   /      -> create
/// PUT    /{id}  -> update
/// DELETE /{id}  -> deactivate
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list_all).post(services::create))
        .route("/{id}", put(services::update).delete(services::deactivate))
}
