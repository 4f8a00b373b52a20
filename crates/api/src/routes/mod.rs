pub mod admin;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod health;
pub mod messages;
pub mod orders;
pub mod profile;
pub mod properties;
pub mod services;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register, /auth/login, /auth/refresh       public
/// /auth/logout                                     requires auth
///
/// /me                                              profile
/// /properties, /properties/{id}                    listings (own)
/// /services                                        active catalog
/// /orders, /orders/{id}[/cancel|/timeline|/deliverables]
/// /messages                                        own support conversation
/// /billing/payments, /billing/summary, /billing/payment-intents
/// /dashboard/stats, /dashboard/calendar
///
/// /admin/orders, /admin/bookings, /admin/deliverables/{id}
/// /admin/overrides/{kind}/{id}                     inspect, clear
/// /admin/services, /admin/services/{id}
/// /admin/messages/conversations, /admin/messages/{agent_id}
/// /admin/users, /admin/dashboard/stats
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/me", profile::router())
        .nest("/properties", properties::router())
        .nest("/services", services::router())
        .nest("/orders", orders::router())
        .nest("/messages", messages::router())
        .nest("/billing", billing::router())
        .nest("/dashboard", dashboard::router())
        // Admin-only; role checked by the `RequireAdmin` extractor.
        .nest("/admin", admin::router())
        .nest("/admin/services", services::admin_router())
        .nest("/admin/messages", messages::admin_router())
}
