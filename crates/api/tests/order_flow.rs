//! End-to-end order lifecycle against a real database.
//!
//! Needs `DATABASE_URL`; each test gets a fresh migrated database.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    admin_token, body_json, build_test_app, create_admin, get, place_order, post_json, put_json,
    register_agent,
};

#[sqlx::test(migrations = "../db/migrations")]
async fn order_is_priced_from_catalog(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, token) = register_agent(app.clone(), "dana@realty.test").await;

    let order = place_order(app, &token).await;

    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_status"], "unpaid");
    assert_eq!(order["total_cents"], 34_800);
    assert_eq!(order["total_display"], "$348.00");
    assert_eq!(order["agent_name"], "Dana Reyes");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_status_change_is_visible_to_agent(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let app = build_test_app(pool);
    let admin = admin_token(admin_id);
    let (_, token) = register_agent(app.clone(), "dana@realty.test").await;
    let order_id = place_order(app.clone(), &token).await["id"].clone();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/admin/orders/{order_id}/schedule"),
        json!({ "shoot_date": "2030-05-04T15:00:00Z" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "scheduled");

    let response = put_json(
        app.clone(),
        &format!("/api/v1/admin/orders/{order_id}/status"),
        json!({ "status": "shooting" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.clone(), &format!("/api/v1/orders/{order_id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "shooting");

    let response = get(app, &format!("/api/v1/orders/{order_id}/timeline"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelled_order_cannot_be_reopened(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let app = build_test_app(pool);
    let (_, token) = register_agent(app.clone(), "dana@realty.test").await;
    let order_id = place_order(app.clone(), &token).await["id"].clone();

    let admin = admin_token(admin_id);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/orders/{order_id}/cancel"),
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app,
        &format!("/api/v1/admin/orders/{order_id}/status"),
        json!({ "status": "editing" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn agent_cannot_see_another_agents_order(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, owner) = register_agent(app.clone(), "owner@realty.test").await;
    let (_, other) = register_agent(app.clone(), "other@realty.test").await;
    let order_id = place_order(app.clone(), &owner).await["id"].clone();

    let response = get(app.clone(), &format!("/api/v1/orders/{order_id}"), Some(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        app,
        &format!("/api/v1/orders/{order_id}/cancel"),
        json!({}),
        Some(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancel_only_before_the_shoot(pool: PgPool) {
    let admin_id = create_admin(&pool).await;
    let app = build_test_app(pool);
    let (_, token) = register_agent(app.clone(), "dana@realty.test").await;
    let order_id = place_order(app.clone(), &token).await["id"].clone();

    put_json(
        app.clone(),
        &format!("/api/v1/admin/orders/{order_id}/schedule"),
        json!({ "shoot_date": "2030-05-04T15:00:00Z" }),
        Some(&admin_token(admin_id)),
    )
    .await;
    put_json(
        app.clone(),
        &format!("/api/v1/admin/orders/{order_id}/status"),
        json!({ "status": "shooting" }),
        Some(&admin_token(admin_id)),
    )
    .await;

    let response = post_json(
        app,
        &format!("/api/v1/orders/{order_id}/cancel"),
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_without_gateway_is_unavailable(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, token) = register_agent(app.clone(), "dana@realty.test").await;
    let order_id = place_order(app.clone(), &token).await["id"].clone();

    let response = post_json(
        app,
        "/api/v1/billing/payment-intents",
        json!({ "order_id": order_id, "payment_method_ref": "pm_card_visa" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "PAYMENTS_UNAVAILABLE");
}
