//! Response shapes the client deserializes.
//!
//! Only the fields a portal UI needs; unknown fields are ignored.

use serde::{Deserialize, Serialize};
use shootdesk_core::status::{OrderStatus, PaymentStatus};
use shootdesk_core::types::{Cents, DbId, Timestamp};

/// `{ "data": ... }` envelope used by every non-auth endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedInUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Tokens returned by login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: SignedInUser,
}

/// An order as the portal shows it (overrides already applied server-side).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderSummary {
    pub id: DbId,
    pub property_id: DbId,
    pub service_names: Vec<String>,
    pub status: OrderStatus,
    pub status_label: String,
    pub payment_status: PaymentStatus,
    pub shoot_date: Option<Timestamp>,
    pub total_cents: Cents,
    pub total_display: String,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub order_id: Option<DbId>,
    pub sender_name: String,
    pub content: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewMessage<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<DbId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineStepView {
    pub step: String,
    pub label: String,
    /// `complete`, `current`, or `upcoming`.
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderTimeline {
    pub status: OrderStatus,
    pub status_label: String,
    pub current_step: Option<usize>,
    pub cancelled: bool,
    pub steps: Vec<TimelineStepView>,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    pub code: Option<String>,
}
