use axum::routing::{get, post};
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/billing`.
///
/// ```text
/// GET  /payments         -> list_payments
/// GET  /summary          -> summary
/// POST /payment-intents  -> create_payment_intent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payments", get(billing::list_payments))
        .route("/summary", get(billing::summary))
        .route("/payment-intents", post(billing::create_payment_intent))
}
