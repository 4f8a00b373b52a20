//! Domain errors shared by every crate in the workspace.

use crate::types::DbId;

/// Errors raised by domain logic and surfaced through the API.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The row is missing or outside the caller's scope.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid input: {0}")]
    Validation(String),

    /// The request is valid but clashes with the record's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }
}
