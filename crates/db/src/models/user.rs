//! Portal accounts. Agents self-register; admins are seeded.

use serde::{Deserialize, Serialize};
use shootdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A `users` row. Not `Serialize`: it carries the password hash, so API
/// output goes through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub brokerage: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Account as returned by `/me`, `/auth/*` and the admin user list.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub brokerage: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            brokerage: user.brokerage.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub brokerage: Option<String>,
}

/// Self-service profile edit.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub brokerage: Option<String>,
    pub avatar_url: Option<String>,
}
