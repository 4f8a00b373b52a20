//! Order entity model and DTOs.

use serde::Serialize;
use shootdesk_core::status::{OrderStatus, PaymentStatus};
use shootdesk_core::types::{Cents, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `orders` table.
///
/// `status` and `payment_status` here are the authoritative values; API
/// views overlay the override caches on top before rendering.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub property_id: DbId,
    pub agent_id: DbId,
    pub service_names: Vec<String>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: OrderStatus,
    #[sqlx(rename = "payment_status_id", try_from = "i16")]
    pub payment_status: PaymentStatus,
    pub shoot_date: Option<Timestamp>,
    pub agent_name: String,
    pub notes: Option<String>,
    pub total_cents: Cents,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an order. Built by the handler after pricing.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub property_id: DbId,
    pub agent_id: DbId,
    pub service_names: Vec<String>,
    pub shoot_date: Option<Timestamp>,
    pub agent_name: String,
    pub notes: Option<String>,
    pub total_cents: Cents,
}
