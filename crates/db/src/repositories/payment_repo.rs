//! Repository for the `payments` table.

use sqlx::PgPool;
use shootdesk_core::status::PaymentAttemptStatus;
use shootdesk_core::types::DbId;

use crate::models::payment::{CreatePayment, Payment};

const COLUMNS: &str = "id, order_id, agent_id, amount_cents, payment_method_ref, intent_id, \
                       status_id, error_message, created_at";

/// Provides operations on recorded payment attempts.
pub struct PaymentRepo;

impl PaymentRepo {
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments
                (order_id, agent_id, amount_cents, payment_method_ref, intent_id, status_id, error_message)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.order_id)
            .bind(input.agent_id)
            .bind(input.amount_cents)
            .bind(&input.payment_method_ref)
            .bind(&input.intent_id)
            .bind(input.status.id())
            .bind(&input.error_message)
            .fetch_one(pool)
            .await
    }

    /// Record the outcome of an attempt created before the gateway call.
    pub async fn finish(
        pool: &PgPool,
        id: DbId,
        status: PaymentAttemptStatus,
        intent_id: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET
                status_id = $2,
                intent_id = COALESCE($3, intent_id),
                error_message = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(status.id())
            .bind(intent_id)
            .bind(error_message)
            .fetch_optional(pool)
            .await
    }

    /// An agent's payment history, newest first.
    pub async fn list_for_agent(pool: &PgPool, agent_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE agent_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(agent_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the order already has a succeeded payment.
    pub async fn has_succeeded(pool: &PgPool, order_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM payments WHERE order_id = $1 AND status_id = $2)",
        )
        .bind(order_id)
        .bind(PaymentAttemptStatus::Succeeded.id())
        .fetch_one(pool)
        .await
    }
}
