//! Repository for the `properties` table.
//!
//! Reads and writes take an optional `agent_id` scope: `Some` restricts the
//! statement to that agent's rows, `None` (admin) matches any row.

use sqlx::PgPool;
use shootdesk_core::status::PropertyStatus;
use shootdesk_core::types::DbId;

use crate::models::property::{CreateProperty, Property, UpdateProperty};

const COLUMNS: &str = "id, agent_id, address, status_id, beds, baths, sqft, price_cents, \
                       mls_number, thumbnail_url, created_at, updated_at";

/// Provides CRUD operations for property listings.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a listing owned by `agent_id`. Status defaults to `active`.
    pub async fn create(
        pool: &PgPool,
        agent_id: DbId,
        input: &CreateProperty,
    ) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties
                (agent_id, address, status_id, beds, baths, sqft, price_cents, mls_number, thumbnail_url)
             VALUES ($1, $2, COALESCE($3, 2), $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(agent_id)
            .bind(input.address.trim())
            .bind(input.status.map(PropertyStatus::id))
            .bind(input.beds)
            .bind(input.baths)
            .bind(input.sqft)
            .bind(input.price_cents)
            .bind(&input.mls_number)
            .bind(&input.thumbnail_url)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID within the given scope.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        agent_id: Option<DbId>,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE id = $1 AND ($2::BIGINT IS NULL OR agent_id = $2)"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(agent_id)
            .fetch_optional(pool)
            .await
    }

    /// List an agent's listings, newest first.
    pub async fn list_for_agent(pool: &PgPool, agent_id: DbId) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties WHERE agent_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(agent_id)
            .fetch_all(pool)
            .await
    }

    /// Count an agent's listings that are `active` or `coming_soon`.
    pub async fn count_active_for_agent(pool: &PgPool, agent_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM properties WHERE agent_id = $1 AND status_id IN ($2, $3)",
        )
        .bind(agent_id)
        .bind(PropertyStatus::Active.id())
        .bind(PropertyStatus::ComingSoon.id())
        .fetch_one(pool)
        .await
    }

    /// Update a listing. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row matches the id within the scope.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        agent_id: Option<DbId>,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE properties SET
                address = COALESCE($3, address),
                status_id = COALESCE($4, status_id),
                beds = COALESCE($5, beds),
                baths = COALESCE($6, baths),
                sqft = COALESCE($7, sqft),
                price_cents = COALESCE($8, price_cents),
                mls_number = COALESCE($9, mls_number),
                thumbnail_url = COALESCE($10, thumbnail_url)
             WHERE id = $1 AND ($2::BIGINT IS NULL OR agent_id = $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(agent_id)
            .bind(input.address.as_deref().map(str::trim))
            .bind(input.status.map(PropertyStatus::id))
            .bind(input.beds)
            .bind(input.baths)
            .bind(input.sqft)
            .bind(input.price_cents)
            .bind(&input.mls_number)
            .bind(&input.thumbnail_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a listing. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation if orders still reference it.
    pub async fn delete(pool: &PgPool, id: DbId, agent_id: Option<DbId>) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM properties WHERE id = $1 AND ($2::BIGINT IS NULL OR agent_id = $2)",
        )
        .bind(id)
        .bind(agent_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
