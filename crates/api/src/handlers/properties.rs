//! Handlers for the `/properties` resource.
//!
//! Agents only reach their own listings; admins reach every listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shootdesk_core::error::CoreError;
use shootdesk_core::types::DbId;
use shootdesk_db::models::property::{CreateProperty, Property, UpdateProperty};
use shootdesk_db::repositories::PropertyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Property", id))
}

/// POST /api/v1/properties
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProperty>,
) -> AppResult<(StatusCode, Json<DataResponse<Property>>)> {
    input.validate()?;
    let property = PropertyRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(property_id = property.id, user_id = auth.user_id, "Property created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: property })))
}

/// GET /api/v1/properties
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Property>>>> {
    let properties = PropertyRepo::list_for_agent(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: properties }))
}

/// GET /api/v1/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Property>>> {
    let property = PropertyRepo::find_by_id(&state.pool, id, auth.scope())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: property }))
}

/// PUT /api/v1/properties/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProperty>,
) -> AppResult<Json<DataResponse<Property>>> {
    input.validate()?;
    let property = PropertyRepo::update(&state.pool, id, auth.scope(), &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: property }))
}

/// DELETE /api/v1/properties/{id}
///
/// Listings with orders cannot be deleted (409 from the foreign key).
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PropertyRepo::delete(&state.pool, id, auth.scope()).await? {
        tracing::info!(property_id = id, user_id = auth.user_id, "Property deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
