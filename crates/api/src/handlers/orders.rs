//! Handlers for the `/orders` resource.
//!
//! Every order read goes through [`OrderOverrides::apply`] so the agent sees
//! admin changes as soon as they are made.
//!
//! [`OrderOverrides::apply`]: crate::overrides::OrderOverrides::apply

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use shootdesk_core::error::CoreError;
use shootdesk_core::pricing::order_total;
use shootdesk_core::status::OrderStatus;
use shootdesk_core::timeline::{timeline, Timeline};
use shootdesk_core::types::{DbId, Timestamp};
use shootdesk_core::validation::{require_max_len, MAX_NOTES_LEN};
use shootdesk_db::models::deliverable::Deliverable;
use shootdesk_db::models::order::CreateOrder;
use shootdesk_db::repositories::{
    DeliverableRepo, OrderRepo, PropertyRepo, ServicePricingRepo, UserRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::overrides::OrderView;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub property_id: DbId,
    pub service_names: Vec<String>,
    /// Preferred shoot time; confirmed by an admin when scheduling.
    pub shoot_date: Option<Timestamp>,
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    fn validate(&self, now: Timestamp) -> Result<(), CoreError> {
        if self.service_names.is_empty() {
            return Err(CoreError::Validation(
                "At least one service must be selected".into(),
            ));
        }
        if let Some(notes) = &self.notes {
            require_max_len("notes", notes, MAX_NOTES_LEN)?;
        }
        if self.shoot_date.is_some_and(|d| d < now) {
            return Err(CoreError::Validation(
                "shoot_date must not be in the past".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Order", id))
}

/// Load one order within `scope` and overlay its overrides.
pub(crate) async fn load_view(
    state: &AppState,
    id: DbId,
    scope: Option<DbId>,
) -> AppResult<OrderView> {
    let order = OrderRepo::find_by_id(&state.pool, id, scope)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(state.overrides.apply(order))
}

/// POST /api/v1/orders
///
/// Prices the selection against the live catalog and creates a `pending`,
/// `unpaid` order on one of the caller's listings.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<OrderView>>)> {
    input.validate(Utc::now())?;

    let property = PropertyRepo::find_by_id(&state.pool, input.property_id, Some(auth.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Property", input.property_id)))?;

    let catalog = ServicePricingRepo::list(&state.pool).await?;
    let total_cents = order_total(&input.service_names, &catalog)?;

    let agent = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::Unauthorized(
            "User no longer exists".into(),
        )))?;

    let order = OrderRepo::create(
        &state.pool,
        &CreateOrder {
            property_id: property.id,
            agent_id: agent.id,
            service_names: input.service_names,
            shoot_date: input.shoot_date,
            agent_name: agent.name,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            total_cents,
        },
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        user_id = auth.user_id,
        total_cents,
        "Order placed"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: state.overrides.apply(order),
        }),
    ))
}

/// GET /api/v1/orders
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<OrderView>>>> {
    let orders = OrderRepo::list_for_agent(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: state.overrides.apply_all(orders),
    }))
}

/// GET /api/v1/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    let view = load_view(&state, id, auth.scope()).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/orders/{id}/cancel
///
/// Only `pending` and `scheduled` orders can be cancelled by the agent.
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    let view = load_view(&state, id, auth.scope()).await?;
    let current = view.order.status;
    if !current.is_cancellable() {
        return Err(CoreError::Conflict(format!(
            "Order in status '{current}' can no longer be cancelled"
        ))
        .into());
    }

    state.overrides.status.set(id, OrderStatus::Cancelled);
    let order = OrderRepo::update_status(&state.pool, id, OrderStatus::Cancelled)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(order_id = id, user_id = auth.user_id, from = %current, "Order cancelled");
    Ok(Json(DataResponse {
        data: state.overrides.apply(order),
    }))
}

/// GET /api/v1/orders/{id}/timeline
pub async fn get_timeline(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Timeline>>> {
    let view = load_view(&state, id, auth.scope()).await?;
    Ok(Json(DataResponse {
        data: timeline(view.order.status),
    }))
}

/// GET /api/v1/orders/{id}/deliverables
pub async fn list_deliverables(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Deliverable>>>> {
    let order = OrderRepo::find_by_id(&state.pool, id, auth.scope())
        .await?
        .ok_or_else(|| not_found(id))?;
    let rows = DeliverableRepo::list_for_order(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: state.overrides.deliverables(&order, rows),
    }))
}
