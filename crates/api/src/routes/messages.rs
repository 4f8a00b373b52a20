//! Route definitions for support messaging.

use axum::routing::get;
use axum::Router;

use crate::handlers::messages;
use crate::state::AppState;

/// Routes mounted at `/messages`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(messages::list_own).post(messages::send_own))
}

/// Routes mounted at `/admin/messages`.
///
/// ```text
/// GET  /conversations  -> list_conversations
/// GET  /{agent_id}     -> list_for_agent
/// POST /{agent_id}     -> reply
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(messages::list_conversations))
        .route(
            "/{agent_id}",
            get(messages::list_for_agent).post(messages::reply),
        )
}
