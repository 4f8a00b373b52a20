//! Agent and admin accounts.

use sqlx::PgPool;
use shootdesk_core::types::DbId;

use crate::models::user::{CreateUser, UpdateProfile, User};

const COLUMNS: &str =
    "id, name, email, password_hash, role, brokerage, avatar_url, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert an account. Fails with `uq_users_email` on a taken email.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role, brokerage)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(&input.brokerage)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Every account, newest signup first. Admin-only listing.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Patch the caller's own profile; `None` leaves a column as is.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                brokerage = COALESCE($3, brokerage),
                avatar_url = COALESCE($4, avatar_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.brokerage)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }
}
