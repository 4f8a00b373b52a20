use sqlx::PgPool;

/// Connect, migrate, and verify every lookup table is seeded.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    shootdesk_db::health_check(&pool).await.unwrap();

    let tables = [
        ("order_statuses", 7),
        ("payment_statuses", 5),
        ("property_statuses", 5),
        ("asset_kinds", 5),
        ("payment_attempt_statuses", 4),
    ];

    for (table, expected) in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, expected, "{table} seed row count");
    }
}

/// The seeded lookup names must match the enum keys used in code.
#[sqlx::test(migrations = "./migrations")]
async fn test_order_status_seed_matches_enum(pool: PgPool) {
    use shootdesk_core::status::OrderStatus;

    let rows: Vec<(i16, String)> = sqlx::query_as("SELECT id, name FROM order_statuses ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();

    for (id, name) in rows {
        let status = OrderStatus::from_id(id).unwrap();
        assert_eq!(status.as_str(), name);
    }
}

/// The default service catalog is seeded and active.
#[sqlx::test(migrations = "./migrations")]
async fn test_service_catalog_seeded(pool: PgPool) {
    let services = shootdesk_db::repositories::ServicePricingRepo::list_active(&pool)
        .await
        .unwrap();
    assert_eq!(services.len(), 5);
    assert_eq!(services[0].name, "HDR Photography");
}
