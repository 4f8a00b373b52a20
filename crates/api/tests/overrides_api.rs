//! Admin override inspection endpoints.
//!
//! The override caches live in `AppState`, so these run against a lazy pool.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use common::{admin_token, body_json, build_app, delete, get, lazy_pool, test_state};
use shootdesk_core::status::{AssetKind, OrderStatus, PaymentStatus};
use shootdesk_db::models::deliverable::Deliverable;

#[tokio::test]
async fn inspect_returns_stored_status_override() {
    let state = test_state(lazy_pool());
    state.overrides.status.set(42, OrderStatus::Editing);
    let app = build_app(state);

    let response = get(app, "/api/v1/admin/overrides/status/42", Some(&admin_token(1))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "status");
    assert_eq!(json["data"]["id"], 42);
    assert_eq!(json["data"]["value"], "editing");
    assert!(json["data"]["set_at"].is_string());
}

#[tokio::test]
async fn inspect_reports_each_cache_separately() {
    let state = test_state(lazy_pool());
    state.overrides.payment.set(9, PaymentStatus::Paid);
    let app = build_app(state);
    let token = admin_token(1);

    let response = get(app.clone(), "/api/v1/admin/overrides/payment/9", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["value"], "paid");

    let response = get(app, "/api/v1/admin/overrides/status/9", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inspect_asset_override_lists_deliverables() {
    let state = test_state(lazy_pool());
    state.overrides.assets.set(
        3,
        vec![Deliverable {
            id: 11,
            order_id: 3,
            kind: AssetKind::Drone,
            label: "Aerial set".into(),
            url: "https://cdn.example.com/3/aerial.zip".into(),
            service_name: "Drone".into(),
            created_at: Utc::now(),
        }],
    );
    let app = build_app(state);

    let response = get(app, "/api/v1/admin/overrides/assets/3", Some(&admin_token(1))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let assets = json["data"]["value"].as_array().expect("assets should be a list");
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["kind"], "drone");
    assert_eq!(assets[0]["label"], "Aerial set");
}

#[tokio::test]
async fn clear_removes_override_once() {
    let state = test_state(lazy_pool());
    state.overrides.status.set(5, OrderStatus::Delivered);
    let overrides = Arc::clone(&state.overrides);
    let app = build_app(state);
    let token = admin_token(1);

    let response = delete(app.clone(), "/api/v1/admin/overrides/status/5", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(overrides.status.get(5), None);

    let response = delete(app.clone(), "/api/v1/admin/overrides/status/5", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/admin/overrides/status/5", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clearing_one_kind_keeps_the_others() {
    let state = test_state(lazy_pool());
    state.overrides.status.set(8, OrderStatus::Shooting);
    state.overrides.payment.set(8, PaymentStatus::Processing);
    let overrides = Arc::clone(&state.overrides);
    let app = build_app(state);

    let response = delete(app, "/api/v1/admin/overrides/payment/8", Some(&admin_token(1))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(overrides.payment.get(8), None);
    assert_eq!(overrides.status.get(8), Some(OrderStatus::Shooting));
}
