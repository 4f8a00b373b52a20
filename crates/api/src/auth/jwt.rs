//! Access tokens and refresh tokens.
//!
//! Access tokens are short-lived HS256 JWTs carrying the user id and role.
//! Refresh tokens are opaque UUID strings; only their SHA-256 hex digest is
//! stored in `sessions`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shootdesk_core::types::DbId;
use uuid::Uuid;

use crate::config::env_or;

const ACCESS_EXPIRY_MINS_DEFAULT: i64 = 15;
const REFRESH_EXPIRY_DAYS_DEFAULT: i64 = 7;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: DbId,
    /// `agent` or `admin`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` (required, non-empty), `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15) and `JWT_REFRESH_EXPIRY_DAYS` (default 7).
    ///
    /// # Panics
    ///
    /// On a missing secret or a lifetime that is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", ACCESS_EXPIRY_MINS_DEFAULT),
            refresh_token_expiry_days: env_or(
                "JWT_REFRESH_EXPIRY_DAYS",
                REFRESH_EXPIRY_DAYS_DEFAULT,
            ),
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Sign an HS256 access token for `user_id`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_owned(),
        exp: iat + config.access_token_ttl_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::default(), &claims, &config.encoding_key())
}

/// Check signature and expiry; returns the claims on success.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, &config.decoding_key(), &Validation::default()).map(|d| d.claims)
}

/// A freshly minted refresh token: the plaintext for the client and the
/// digest for the `sessions` row.
pub struct RefreshToken {
    pub plaintext: String,
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let plaintext = Uuid::new_v4().to_string();
        let hash = hash_refresh_token(&plaintext);
        Self { plaintext, hash }
    }
}

/// SHA-256 hex digest of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    hex_digest(Sha256::digest(token.as_bytes()).as_slice())
}

fn hex_digest(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_round_trips_claims() {
        let cfg = config("unit-test-secret");
        let token = generate_access_token(42, "agent", &cfg).unwrap();

        let claims = validate_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "agent");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_token_rejected() {
        let cfg = config("unit-test-secret");
        // Well past the default 60 second leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "agent".into(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &cfg.encoding_key()).unwrap();

        assert!(validate_token(&token, &cfg).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = generate_access_token(1, "admin", &config("alpha")).unwrap();
        assert!(validate_token(&token, &config("bravo")).is_err());
    }

    #[test]
    fn refresh_token_hash_is_stable_hex() {
        let token = RefreshToken::generate();
        assert_eq!(token.hash, hash_refresh_token(&token.plaintext));
        assert_eq!(token.hash.len(), 64);
        assert_ne!(RefreshToken::generate().plaintext, token.plaintext);
    }
}
