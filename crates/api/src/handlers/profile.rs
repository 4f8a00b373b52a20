//! Handlers for `/me` (the caller's own profile).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use shootdesk_core::error::CoreError;
use shootdesk_db::models::user::{UpdateProfile, UserResponse};
use shootdesk_db::repositories::UserRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /me`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub brokerage: Option<String>,
    #[validate(url(message = "avatar_url must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// GET /api/v1/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", auth.user_id)))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(CoreError::Validation("name must not be empty".into()).into());
    }

    let update = UpdateProfile {
        name: input.name.map(|n| n.trim().to_string()),
        brokerage: input.brokerage,
        avatar_url: input.avatar_url,
    };
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", auth.user_id)))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}
