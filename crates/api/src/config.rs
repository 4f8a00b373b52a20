use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use shootdesk_core::overrides::MergePolicy;

use crate::auth::jwt::JwtConfig;
use crate::payments::PaymentConfig;

/// Default minimum password length for self-registration.
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Portal origins allowed by CORS.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Directory holding the override cache files. `None` keeps them in memory.
    pub override_store_dir: Option<PathBuf>,
    /// How overrides are reconciled with freshly read rows.
    pub merge_policy: MergePolicy,
    /// Payment gateway endpoint and credentials.
    pub payment: PaymentConfig,
    /// Minimum accepted password length on registration.
    pub min_password_length: usize,
}

impl ServerConfig {
    /// Read from the environment; only `JWT_SECRET` is required here.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `OVERRIDE_STORE_DIR`    | unset (in-memory)          |
    /// | `OVERRIDE_MERGE_POLICY` | `override_wins`            |
    /// | `MIN_PASSWORD_LENGTH`   | `8`                        |
    ///
    /// JWT and payment settings are read by [`JwtConfig::from_env`] and
    /// [`PaymentConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let override_store_dir = std::env::var("OVERRIDE_STORE_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            override_store_dir,
            merge_policy: env_or("OVERRIDE_MERGE_POLICY", MergePolicy::default()),
            payment: PaymentConfig::from_env(),
            min_password_length: env_or("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH),
        }
    }
}

/// Parse `name` from the environment, or `default` when unset.
///
/// # Panics
///
/// When the variable is set but does not parse as `T`.
pub(crate) fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name}='{raw}' is invalid: {e}")),
        Err(_) => default,
    }
}
