//! Route definitions for the `/properties` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::properties;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(properties::list).post(properties::create))
        .route(
            "/{id}",
            get(properties::get_by_id)
                .put(properties::update)
                .delete(properties::delete),
        )
}
