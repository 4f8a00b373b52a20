//! Handlers for the `/auth` resource (register, login, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use shootdesk_core::error::CoreError;
use shootdesk_core::roles::ROLE_AGENT;
use shootdesk_db::models::session::CreateSession;
use shootdesk_db::models::user::{CreateUser, User, UserResponse};
use shootdesk_db::repositories::{SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, hash_refresh_token, RefreshToken};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 200))]
    pub brokerage: Option<String>,
}

/// Credentials for `POST /auth/login`. The email is matched case-insensitively.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair plus the signed-in user, returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /api/v1/auth/register
///
/// Self-service signup. New accounts always get the `agent` role.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, state.config.min_password_length)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash,
            role: ROLE_AGENT.to_string(),
            brokerage: input.brokerage.filter(|b| !b.trim().is_empty()),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Agent registered");

    let response = issue_session(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || unauthorized("Invalid email or password");

    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let response = issue_session(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a live refresh token for a new pair. The old session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let hash = hash_refresh_token(&input.refresh_token);
    let Some(session) = SessionRepo::find_by_refresh_token_hash(&state.pool, &hash).await? else {
        return Err(unauthorized("Invalid or expired refresh token"));
    };

    // Rotation: the presented token is single-use.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let Some(user) = UserRepo::find_by_id(&state.pool, session.user_id).await? else {
        return Err(unauthorized("User no longer exists"));
    };

    let response = issue_session(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke every session of the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::debug!(user_id = auth_user.user_id, revoked, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_owned()))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sign an access token and store a new refresh session for `user`.
async fn issue_session(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let refresh = RefreshToken::generate();
    let session = CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh.hash,
        expires_at: Utc::now() + Duration::days(jwt.refresh_token_expiry_days),
    };
    SessionRepo::create(&state.pool, &session).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh.plaintext,
        expires_in: jwt.access_token_ttl_secs(),
        user: UserResponse::from(user),
    })
}
