//! Repository for the `orders` table.

use sqlx::PgPool;
use shootdesk_core::status::{OrderStatus, PaymentStatus};
use shootdesk_core::types::{DbId, Timestamp};

use crate::models::order::{CreateOrder, Order};

const COLUMNS: &str = "id, property_id, agent_id, service_names, status_id, payment_status_id, \
                       shoot_date, agent_name, notes, total_cents, created_at, updated_at";

/// Provides CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order in `pending` / `unpaid`.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders
                (property_id, agent_id, service_names, shoot_date, agent_name, notes, total_cents)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.property_id)
            .bind(input.agent_id)
            .bind(&input.service_names)
            .bind(input.shoot_date)
            .bind(&input.agent_name)
            .bind(&input.notes)
            .bind(input.total_cents)
            .fetch_one(pool)
            .await
    }

    /// Find an order by ID. `agent_id = Some` restricts to that agent's rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        agent_id: Option<DbId>,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE id = $1 AND ($2::BIGINT IS NULL OR agent_id = $2)"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(agent_id)
            .fetch_optional(pool)
            .await
    }

    /// An agent's orders, newest first.
    pub async fn list_for_agent(pool: &PgPool, agent_id: DbId) -> Result<Vec<Order>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM orders WHERE agent_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Order>(&query)
            .bind(agent_id)
            .fetch_all(pool)
            .await
    }

    /// Every order, newest first.
    ///
    /// Status filtering happens after the override merge, so it is not done
    /// here.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC");
        sqlx::query_as::<_, Order>(&query).fetch_all(pool).await
    }

    /// Orders with a shoot in `[start, end)`, optionally scoped to one agent,
    /// ordered by shoot time.
    pub async fn list_shoots_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
        agent_id: Option<DbId>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE shoot_date >= $1 AND shoot_date < $2
               AND ($3::BIGINT IS NULL OR agent_id = $3)
             ORDER BY shoot_date, id"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(start)
            .bind(end)
            .bind(agent_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the fulfilment status.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: OrderStatus,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query =
            format!("UPDATE orders SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the payment status.
    pub async fn update_payment_status(
        pool: &PgPool,
        id: DbId,
        status: PaymentStatus,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET payment_status_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Set the shoot date and, when given, the status in one statement.
    pub async fn schedule(
        pool: &PgPool,
        id: DbId,
        shoot_date: Timestamp,
        status: Option<OrderStatus>,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                shoot_date = $2,
                status_id = COALESCE($3, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(shoot_date)
            .bind(status.map(OrderStatus::id))
            .fetch_optional(pool)
            .await
    }

    /// Bump `updated_at` without changing any field.
    pub async fn touch(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE orders SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
