//! Admin gate for the `/admin` routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shootdesk_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] whose role is `admin`. Agents get 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.is_admin() {
            true => Ok(Self(user)),
            false => Err(AppError::Core(CoreError::Forbidden(
                "This action is restricted to studio admins".into(),
            ))),
        }
    }
}
