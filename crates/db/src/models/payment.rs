//! Payment attempt model and DTOs.

use serde::Serialize;
use shootdesk_core::status::PaymentAttemptStatus;
use shootdesk_core::types::{Cents, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `payments` table: one attempt to pay for an order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub order_id: DbId,
    pub agent_id: DbId,
    pub amount_cents: Cents,
    pub payment_method_ref: String,
    pub intent_id: Option<String>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: PaymentAttemptStatus,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a payment attempt.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub order_id: DbId,
    pub agent_id: DbId,
    pub amount_cents: Cents,
    pub payment_method_ref: String,
    pub intent_id: Option<String>,
    pub status: PaymentAttemptStatus,
    pub error_message: Option<String>,
}
