//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /orders                          -> list_orders (?status=)
/// PUT    /orders/{id}/status              -> update_status
/// PUT    /orders/{id}/payment-status      -> update_payment_status
/// PUT    /orders/{id}/schedule            -> schedule
/// POST   /orders/{id}/deliverables        -> add_deliverable
/// DELETE /deliverables/{id}               -> delete_deliverable
/// GET    /bookings                        -> bookings (?year=&month=)
/// GET    /overrides/{kind}/{id}           -> get_override
/// DELETE /overrides/{kind}/{id}           -> clear_override
/// GET    /users                           -> list_users
/// GET    /dashboard/stats                 -> admin_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}/status", put(admin::update_status))
        .route(
            "/orders/{id}/payment-status",
            put(admin::update_payment_status),
        )
        .route("/orders/{id}/schedule", put(admin::schedule))
        .route("/orders/{id}/deliverables", post(admin::add_deliverable))
        .route("/deliverables/{id}", delete(admin::delete_deliverable))
        .route("/bookings", get(admin::bookings))
        .route(
            "/overrides/{kind}/{id}",
            get(admin::get_override).delete(admin::clear_override),
        )
        .route("/users", get(admin::list_users))
        .route("/dashboard/stats", get(admin::admin_stats))
}
