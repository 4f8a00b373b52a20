//! Service catalog handlers, agent-facing and admin.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shootdesk_core::error::CoreError;
use shootdesk_core::types::DbId;
use shootdesk_db::models::service_pricing::{
    CreateServicePricing, ServicePricing, UpdateServicePricing,
};
use shootdesk_db::repositories::ServicePricingRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Service", id))
}

/// GET /api/v1/services
///
/// Services currently offered, in display order.
pub async fn list_active(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ServicePricing>>>> {
    let services = ServicePricingRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

/// GET /api/v1/admin/services
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<ServicePricing>>>> {
    let services = ServicePricingRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

/// POST /api/v1/admin/services
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateServicePricing>,
) -> AppResult<(StatusCode, Json<DataResponse<ServicePricing>>)> {
    input.validate()?;
    let service = ServicePricingRepo::create(&state.pool, &input).await?;
    tracing::info!(service_id = service.id, user_id = admin.user_id, "Service created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}

/// PUT /api/v1/admin/services/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServicePricing>,
) -> AppResult<Json<DataResponse<ServicePricing>>> {
    input.validate()?;
    let service = ServicePricingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(service_id = id, user_id = admin.user_id, "Service updated");
    Ok(Json(DataResponse { data: service }))
}

/// DELETE /api/v1/admin/services/{id}
///
/// Deactivates rather than deletes; past orders keep referring to it by name.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ServicePricingRepo::deactivate(&state.pool, id).await? {
        tracing::info!(service_id = id, user_id = admin.user_id, "Service deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
