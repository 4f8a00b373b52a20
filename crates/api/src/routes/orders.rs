//! Route definitions for the `/orders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// GET  /                    -> list
/// POST /                    -> create
/// GET  /{id}                -> get_by_id
/// POST /{id}/cancel         -> cancel
/// GET  /{id}/timeline       -> get_timeline
/// GET  /{id}/deliverables   -> list_deliverables
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::get_by_id))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/timeline", get(orders::get_timeline))
        .route("/{id}/deliverables", get(orders::list_deliverables))
}
