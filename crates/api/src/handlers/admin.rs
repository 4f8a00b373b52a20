//! Admin back-office handlers: order pipeline, bookings, deliverables,
//! override inspection, users, and stats.
//!
//! Every write that changes what an agent sees sets the matching override
//! first and then writes the row.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shootdesk_core::calendar::month_bounds;
use shootdesk_core::error::CoreError;
use shootdesk_core::stats::{AdminStats, OrderSnapshot};
use shootdesk_core::status::{OrderStatus, PaymentStatus};
use shootdesk_core::timeline::validate_transition;
use shootdesk_core::types::{DbId, Timestamp};
use shootdesk_db::models::deliverable::{CreateDeliverable, Deliverable};
use shootdesk_db::models::user::UserResponse;
use shootdesk_db::repositories::{DeliverableRepo, OrderRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::dashboard::{month_calendar, MonthCalendar};
use crate::handlers::orders::{load_view, not_found};
use crate::middleware::rbac::RequireAdmin;
use crate::overrides::{OrderView, OverrideKind, OverrideSnapshot};
use crate::query::{MonthParams, StatusFilterParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Request body for `PUT /admin/orders/{id}/payment-status`.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

/// Request body for `PUT /admin/orders/{id}/schedule`.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub shoot_date: Timestamp,
}

/// Month of bookings across all agents, plus pending orders still
/// waiting for a shoot date.
#[derive(Debug, Serialize)]
pub struct Bookings {
    #[serde(flatten)]
    pub calendar: MonthCalendar,
    pub unscheduled: Vec<OrderView>,
}

/// Keep only views whose merged status matches `filter`.
fn filter_by_status(views: Vec<OrderView>, filter: Option<OrderStatus>) -> Vec<OrderView> {
    match filter {
        Some(status) => views
            .into_iter()
            .filter(|v| v.order.status == status)
            .collect(),
        None => views,
    }
}

/// Status a scheduling request moves the order to, if it changes.
fn status_after_scheduling(current: OrderStatus) -> Result<Option<OrderStatus>, CoreError> {
    if current.is_terminal() {
        return Err(CoreError::Validation(format!(
            "Cannot schedule an order in status '{current}'"
        )));
    }
    Ok((current == OrderStatus::Pending).then_some(OrderStatus::Scheduled))
}

/// Re-read the order's deliverables and store them as its asset override.
async fn refresh_assets(state: &AppState, order_id: DbId) -> AppResult<Vec<Deliverable>> {
    OrderRepo::touch(&state.pool, order_id).await?;
    let rows = DeliverableRepo::list_for_order(&state.pool, order_id).await?;
    state.overrides.assets.set(order_id, rows.clone());
    Ok(rows)
}

/// GET /api/v1/admin/orders?status=
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<OrderView>>>> {
    let filter = params
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;

    let orders = OrderRepo::list_all(&state.pool).await?;
    let views = filter_by_status(state.overrides.apply_all(orders), filter);
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/admin/bookings?year=&month=
pub async fn bookings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<MonthParams>,
) -> AppResult<Json<DataResponse<Bookings>>> {
    let (year, month) = params.resolve();
    let (start, end) = month_bounds(year, month)?;

    let shoots = OrderRepo::list_shoots_between(&state.pool, start, end, None).await?;
    let calendar = month_calendar(year, month, state.overrides.apply_all(shoots))?;

    let unscheduled = state
        .overrides
        .apply_all(OrderRepo::list_all(&state.pool).await?)
        .into_iter()
        .filter(|v| v.order.shoot_date.is_none() && v.order.status == OrderStatus::Pending)
        .collect();

    Ok(Json(DataResponse {
        data: Bookings {
            calendar,
            unscheduled,
        },
    }))
}

/// PUT /api/v1/admin/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    let current = load_view(&state, id, None).await?.order.status;
    validate_transition(current, input.status)?;

    state.overrides.status.set(id, input.status);
    let order = OrderRepo::update_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        order_id = id,
        user_id = admin.user_id,
        from = %current,
        status = %input.status,
        "Order status updated"
    );
    Ok(Json(DataResponse {
        data: state.overrides.apply(order),
    }))
}

/// PUT /api/v1/admin/orders/{id}/payment-status
pub async fn update_payment_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    load_view(&state, id, None).await?;

    state.overrides.payment.set(id, input.payment_status);
    let order = OrderRepo::update_payment_status(&state.pool, id, input.payment_status)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        order_id = id,
        user_id = admin.user_id,
        status = %input.payment_status,
        "Order payment status updated"
    );
    Ok(Json(DataResponse {
        data: state.overrides.apply(order),
    }))
}

/// PUT /api/v1/admin/orders/{id}/schedule
///
/// Sets the shoot date. A `pending` order moves to `scheduled`.
pub async fn schedule(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ScheduleRequest>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    let current = load_view(&state, id, None).await?.order.status;
    let next = status_after_scheduling(current)?;

    if let Some(status) = next {
        state.overrides.status.set(id, status);
    }
    let order = OrderRepo::schedule(&state.pool, id, input.shoot_date, next)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        order_id = id,
        user_id = admin.user_id,
        shoot_date = %input.shoot_date,
        "Shoot scheduled"
    );
    Ok(Json(DataResponse {
        data: state.overrides.apply(order),
    }))
}

/// POST /api/v1/admin/orders/{id}/deliverables
pub async fn add_deliverable(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(order_id): Path<DbId>,
    Json(input): Json<CreateDeliverable>,
) -> AppResult<(StatusCode, Json<DataResponse<Deliverable>>)> {
    input.validate()?;
    OrderRepo::find_by_id(&state.pool, order_id, None)
        .await?
        .ok_or_else(|| not_found(order_id))?;

    let deliverable = DeliverableRepo::create(&state.pool, order_id, &input).await?;
    let assets = refresh_assets(&state, order_id).await?;

    tracing::info!(
        order_id,
        deliverable_id = deliverable.id,
        user_id = admin.user_id,
        asset_count = assets.len(),
        "Deliverable added"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: deliverable })))
}

/// DELETE /api/v1/admin/deliverables/{id}
pub async fn delete_deliverable(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = DeliverableRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Deliverable", id)))?;
    refresh_assets(&state, removed.order_id).await?;

    tracing::info!(
        order_id = removed.order_id,
        deliverable_id = id,
        user_id = admin.user_id,
        "Deliverable removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/overrides/{kind}/{id}
pub async fn get_override(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((kind, id)): Path<(OverrideKind, DbId)>,
) -> AppResult<Json<DataResponse<OverrideSnapshot>>> {
    let snapshot = state
        .overrides
        .inspect(kind, id)
        .ok_or(AppError::Core(CoreError::not_found("Override", id)))?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// DELETE /api/v1/admin/overrides/{kind}/{id}
///
/// The order falls back to its stored value on the next read.
pub async fn clear_override(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((kind, id)): Path<(OverrideKind, DbId)>,
) -> AppResult<StatusCode> {
    if !state.overrides.clear(kind, id) {
        return Err(AppError::Core(CoreError::not_found("Override", id)));
    }
    tracing::info!(order_id = id, user_id = admin.user_id, ?kind, "Override cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/admin/dashboard/stats
pub async fn admin_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<AdminStats>>> {
    let orders = OrderRepo::list_all(&state.pool).await?;
    let snapshots: Vec<OrderSnapshot> = state
        .overrides
        .apply_all(orders)
        .iter()
        .map(OrderView::snapshot)
        .collect();
    Ok(Json(DataResponse {
        data: AdminStats::compute(&snapshots, Utc::now()),
    }))
}
