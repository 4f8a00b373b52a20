//! Input validation that happens before any database access.

mod common;

use axum::http::StatusCode;
use common::{admin_token, agent_token, body_json, build_offline_app, get, post_json};
use serde_json::json;

async fn assert_validation_error(response: axum::http::Response<axum::body::Body>) -> String {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    json["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/auth/register",
        json!({ "name": "Dana Reyes", "email": "not-an-email", "password": "correct-horse-1" }),
        None,
    )
    .await;
    let message = assert_validation_error(response).await;
    assert!(message.contains("email"), "{message}");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/auth/register",
        json!({ "name": "Dana Reyes", "email": "dana@example.com", "password": "short" }),
        None,
    )
    .await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn property_requires_address() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/properties",
        json!({ "address": "   " }),
        Some(&agent_token(2)),
    )
    .await;
    let message = assert_validation_error(response).await;
    assert!(message.contains("address"), "{message}");
}

#[tokio::test]
async fn order_requires_a_service() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/orders",
        json!({ "property_id": 1, "service_names": [] }),
        Some(&agent_token(2)),
    )
    .await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn order_rejects_past_shoot_date() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/orders",
        json!({
            "property_id": 1,
            "service_names": ["Drone"],
            "shoot_date": "2020-01-01T10:00:00Z",
        }),
        Some(&agent_token(2)),
    )
    .await;
    let message = assert_validation_error(response).await;
    assert!(message.contains("shoot_date"), "{message}");
}

#[tokio::test]
async fn message_content_must_not_be_blank() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/messages",
        json!({ "content": "  " }),
        Some(&agent_token(2)),
    )
    .await;
    assert_validation_error(response).await;

    let response = post_json(
        build_offline_app(),
        "/api/v1/admin/messages/2",
        json!({ "content": "" }),
        Some(&admin_token(1)),
    )
    .await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn payment_requires_method_reference() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/billing/payment-intents",
        json!({ "order_id": 1, "payment_method_ref": "" }),
        Some(&agent_token(2)),
    )
    .await;
    let message = assert_validation_error(response).await;
    assert!(message.contains("payment_method_ref"), "{message}");
}

#[tokio::test]
async fn deliverable_url_must_be_http() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/admin/orders/1/deliverables",
        json!({
            "kind": "photo",
            "label": "Gallery",
            "url": "ftp://files.example.com/gallery.zip",
            "service_name": "HDR Photography",
        }),
        Some(&admin_token(1)),
    )
    .await;
    let message = assert_validation_error(response).await;
    assert!(message.contains("url"), "{message}");
}

#[tokio::test]
async fn unknown_status_filter_rejected() {
    let response = get(
        build_offline_app(),
        "/api/v1/admin/orders?status=lost",
        Some(&admin_token(1)),
    )
    .await;
    let message = assert_validation_error(response).await;
    assert!(message.contains("lost"), "{message}");
}

#[tokio::test]
async fn calendar_rejects_invalid_month() {
    let response = get(
        build_offline_app(),
        "/api/v1/dashboard/calendar?year=2026&month=13",
        Some(&agent_token(2)),
    )
    .await;
    assert_validation_error(response).await;

    let response = get(
        build_offline_app(),
        "/api/v1/admin/bookings?year=2026&month=0",
        Some(&admin_token(1)),
    )
    .await;
    assert_validation_error(response).await;
}
