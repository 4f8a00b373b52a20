//! Repository for the `deliverables` table.

use sqlx::PgPool;
use shootdesk_core::types::DbId;

use crate::models::deliverable::{CreateDeliverable, Deliverable};

const COLUMNS: &str = "id, order_id, kind_id, label, url, service_name, created_at";

/// Provides operations on order deliverables.
pub struct DeliverableRepo;

impl DeliverableRepo {
    pub async fn create(
        pool: &PgPool,
        order_id: DbId,
        input: &CreateDeliverable,
    ) -> Result<Deliverable, sqlx::Error> {
        let query = format!(
            "INSERT INTO deliverables (order_id, kind_id, label, url, service_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deliverable>(&query)
            .bind(order_id)
            .bind(input.kind.id())
            .bind(input.label.trim())
            .bind(input.url.trim())
            .bind(&input.service_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Deliverable>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deliverables WHERE id = $1");
        sqlx::query_as::<_, Deliverable>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All deliverables for an order in upload order.
    pub async fn list_for_order(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<Deliverable>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deliverables WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, Deliverable>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a deliverable, returning the removed row so callers know its order.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Deliverable>, sqlx::Error> {
        let query = format!("DELETE FROM deliverables WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Deliverable>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
