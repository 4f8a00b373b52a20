use std::sync::Arc;

use crate::config::ServerConfig;
use crate::overrides::OrderOverrides;
use crate::payments::PaymentGateway;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: shootdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Status, payment, and asset override caches for orders.
    pub overrides: Arc<OrderOverrides>,
    /// Payment intent gateway.
    pub payments: Arc<dyn PaymentGateway>,
}
