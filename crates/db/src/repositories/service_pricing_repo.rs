//! Repository for the `service_pricing` table.

use sqlx::PgPool;
use shootdesk_core::types::DbId;

use crate::models::service_pricing::{CreateServicePricing, ServicePricing, UpdateServicePricing};

const COLUMNS: &str = "id, name, base_price_cents, description, features, active, sort_order, \
                       created_at, updated_at";

/// Provides CRUD operations for the service catalog.
pub struct ServicePricingRepo;

impl ServicePricingRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateServicePricing,
    ) -> Result<ServicePricing, sqlx::Error> {
        let query = format!(
            "INSERT INTO service_pricing (name, base_price_cents, description, features, sort_order)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServicePricing>(&query)
            .bind(input.name.trim())
            .bind(input.base_price_cents)
            .bind(&input.description)
            .bind(&input.features)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ServicePricing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_pricing WHERE id = $1");
        sqlx::query_as::<_, ServicePricing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Full catalog including inactive entries, in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ServicePricing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_pricing ORDER BY sort_order, id");
        sqlx::query_as::<_, ServicePricing>(&query).fetch_all(pool).await
    }

    /// Only services currently offered to agents.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ServicePricing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_pricing WHERE active = true ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, ServicePricing>(&query).fetch_all(pool).await
    }

    /// Update a catalog entry. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateServicePricing,
    ) -> Result<Option<ServicePricing>, sqlx::Error> {
        let query = format!(
            "UPDATE service_pricing SET
                name = COALESCE($2, name),
                base_price_cents = COALESCE($3, base_price_cents),
                description = COALESCE($4, description),
                features = COALESCE($5, features),
                active = COALESCE($6, active),
                sort_order = COALESCE($7, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServicePricing>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.base_price_cents)
            .bind(&input.description)
            .bind(&input.features)
            .bind(input.active)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Withdraw a service from the catalog. Existing orders keep their names.
    ///
    /// Returns `true` if the service exists (already inactive included).
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE service_pricing SET active = false WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
