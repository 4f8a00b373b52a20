use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shootdesk_core::error::CoreError;

use crate::payments::PaymentError;

/// Error returned by every handler.
///
/// Serialized as `{"error": <message>, "code": <CODE>}` with a matching
/// HTTP status. Internal details are logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

/// Status, machine-readable code and client-facing message of an error.
struct Reply {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Reply {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let reply = match &self {
            AppError::Core(err) => core_reply(err),
            AppError::Database(err) => database_reply(err),
            AppError::Payment(err) => payment_reply(err),
            AppError::BadRequest(msg) => {
                Reply::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.as_str())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Unhandled handler error");
                Reply::internal()
            }
        };

        let body = json!({ "error": reply.message, "code": reply.code });
        (reply.status, axum::Json(body)).into_response()
    }
}

fn core_reply(err: &CoreError) -> Reply {
    match err {
        CoreError::NotFound { entity, id } => Reply::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Reply::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.as_str())
        }
        CoreError::Conflict(msg) => Reply::new(StatusCode::CONFLICT, "CONFLICT", msg.as_str()),
        CoreError::Unauthorized(msg) => {
            Reply::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.as_str())
        }
        CoreError::Forbidden(msg) => Reply::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.as_str()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Domain invariant failed");
            Reply::internal()
        }
    }
}

/// `RowNotFound` is a 404. Postgres unique violations on `uq_*` constraints
/// and foreign key violations are 409. Anything else is logged as a 500.
fn database_reply(err: &sqlx::Error) -> Reply {
    if let sqlx::Error::RowNotFound = err {
        return Reply::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found");
    }

    if let sqlx::Error::Database(db_err) = err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        let sqlstate = db_err.code();
        match sqlstate.as_deref() {
            Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                return Reply::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Value already exists ({constraint})"),
                );
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return Reply::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Record is still referenced or its parent is missing ({constraint})"),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    Reply::internal()
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn payment_reply(err: &PaymentError) -> Reply {
    match err {
        PaymentError::Declined(msg) => {
            Reply::new(StatusCode::PAYMENT_REQUIRED, "PAYMENT_FAILED", msg.as_str())
        }
        PaymentError::NotConfigured => Reply::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "PAYMENTS_UNAVAILABLE",
            "Payments are not configured",
        ),
        PaymentError::Request(_) | PaymentError::Gateway { .. } => {
            tracing::error!(error = %err, "Payment gateway error");
            Reply::new(
                StatusCode::BAD_GATEWAY,
                "PAYMENT_GATEWAY_ERROR",
                "The payment provider could not be reached",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_payment_maps_to_402() {
        let resp = AppError::Payment(PaymentError::Declined("Your card was declined.".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn gateway_failure_maps_to_502() {
        let resp = AppError::Payment(PaymentError::Gateway {
            status: 500,
            body: "upstream".into(),
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unconfigured_payments_map_to_503() {
        let resp = AppError::Payment(PaymentError::NotConfigured).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::Core(CoreError::not_found("Order", 9)).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
