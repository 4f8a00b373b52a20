//! Repository for the `messages` table.

use sqlx::PgPool;
use shootdesk_core::types::DbId;

use crate::models::message::{Conversation, CreateMessage, Message};

const COLUMNS: &str =
    "id, order_id, agent_id, sender_id, sender_name, content, is_admin, created_at";

/// Provides operations on support messages.
pub struct MessageRepo;

impl MessageRepo {
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (order_id, agent_id, sender_id, sender_name, content, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.order_id)
            .bind(input.agent_id)
            .bind(input.sender_id)
            .bind(&input.sender_name)
            .bind(input.content.trim())
            .bind(input.is_admin)
            .fetch_one(pool)
            .await
    }

    /// One agent's conversation in ascending id order.
    ///
    /// `after_id` returns only newer messages, which is what pollers use to
    /// fetch incrementally. `order_id` narrows to one order's thread.
    pub async fn list_for_agent(
        pool: &PgPool,
        agent_id: DbId,
        order_id: Option<DbId>,
        after_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE agent_id = $1
               AND ($2::BIGINT IS NULL OR order_id = $2)
               AND ($3::BIGINT IS NULL OR id > $3)
             ORDER BY id
             LIMIT $4"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(agent_id)
            .bind(order_id)
            .bind(after_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Latest message of every agent conversation, most recent first.
    pub async fn conversations(pool: &PgPool) -> Result<Vec<Conversation>, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(
            "SELECT latest.agent_id,
                    u.name AS agent_name,
                    u.email AS agent_email,
                    latest.content AS last_message,
                    latest.created_at AS last_message_at,
                    latest.is_admin AS last_from_admin,
                    counts.message_count
             FROM (
                 SELECT DISTINCT ON (agent_id) agent_id, content, created_at, is_admin
                 FROM messages
                 ORDER BY agent_id, id DESC
             ) latest
             JOIN users u ON u.id = latest.agent_id
             JOIN (
                 SELECT agent_id, COUNT(*) AS message_count FROM messages GROUP BY agent_id
             ) counts ON counts.agent_id = latest.agent_id
             ORDER BY latest.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
