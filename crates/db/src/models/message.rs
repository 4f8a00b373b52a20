//! Support message model and DTOs.

use serde::{Deserialize, Serialize};
use shootdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `messages` table.
///
/// Every message belongs to one agent's support conversation (`agent_id`),
/// whoever sent it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub order_id: Option<DbId>,
    pub agent_id: DbId,
    pub sender_id: DbId,
    pub sender_name: String,
    pub content: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a message.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub order_id: Option<DbId>,
    pub agent_id: DbId,
    pub sender_id: DbId,
    pub sender_name: String,
    pub content: String,
    pub is_admin: bool,
}

/// Query parameters for incremental message fetches (`?order_id=&after_id=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct MessageListParams {
    pub order_id: Option<DbId>,
    /// Only return messages with an id greater than this.
    pub after_id: Option<DbId>,
    pub limit: Option<i64>,
}

/// One row of the admin inbox: the latest message per agent conversation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub agent_id: DbId,
    pub agent_name: String,
    pub agent_email: String,
    pub last_message: String,
    pub last_message_at: Timestamp,
    pub last_from_admin: bool,
    pub message_count: i64,
}
