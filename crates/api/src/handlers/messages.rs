//! Support messaging handlers.
//!
//! Each agent has one conversation with support. Agents read and post to
//! their own; admins read the inbox and reply into any agent's conversation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use shootdesk_core::error::CoreError;
use shootdesk_core::roles::ROLE_AGENT;
use shootdesk_core::types::DbId;
use shootdesk_core::validation::{clamp_limit, validate_message_content};
use shootdesk_db::models::message::{Conversation, CreateMessage, Message, MessageListParams};
use shootdesk_db::repositories::{MessageRepo, OrderRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{DEFAULT_MESSAGE_LIMIT, MAX_MESSAGE_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for posting a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    /// Optional order the message is about.
    pub order_id: Option<DbId>,
}

/// Ensure `order_id`, when given, belongs to `agent_id`.
async fn check_order(state: &AppState, order_id: Option<DbId>, agent_id: DbId) -> AppResult<()> {
    if let Some(order_id) = order_id {
        OrderRepo::find_by_id(&state.pool, order_id, Some(agent_id))
            .await?
            .ok_or(AppError::Core(CoreError::not_found("Order", order_id)))?;
    }
    Ok(())
}

async fn list_conversation(
    state: &AppState,
    agent_id: DbId,
    params: &MessageListParams,
) -> AppResult<Vec<Message>> {
    let limit = clamp_limit(params.limit, DEFAULT_MESSAGE_LIMIT, MAX_MESSAGE_LIMIT);
    let messages =
        MessageRepo::list_for_agent(&state.pool, agent_id, params.order_id, params.after_id, limit)
            .await?;
    Ok(messages)
}

/// GET /api/v1/messages?order_id=&after_id=&limit=
///
/// Oldest first. Pollers pass the last seen id as `after_id`.
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MessageListParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let messages = list_conversation(&state, auth.user_id, &params).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/messages
pub async fn send_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    validate_message_content(&input.content)?;
    check_order(&state, input.order_id, auth.user_id).await?;

    let sender = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::Unauthorized(
            "User no longer exists".into(),
        )))?;

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            order_id: input.order_id,
            agent_id: sender.id,
            sender_id: sender.id,
            sender_name: sender.name,
            content: input.content,
            is_admin: false,
        },
    )
    .await?;

    tracing::debug!(message_id = message.id, user_id = auth.user_id, "Message sent");
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/admin/messages/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Conversation>>>> {
    let conversations = MessageRepo::conversations(&state.pool).await?;
    Ok(Json(DataResponse {
        data: conversations,
    }))
}

/// GET /api/v1/admin/messages/{agent_id}?order_id=&after_id=&limit=
pub async fn list_for_agent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(agent_id): Path<DbId>,
    Query(params): Query<MessageListParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let messages = list_conversation(&state, agent_id, &params).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/admin/messages/{agent_id}
///
/// Support reply into an agent's conversation (`is_admin = true`).
pub async fn reply(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(agent_id): Path<DbId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    validate_message_content(&input.content)?;

    let agent = UserRepo::find_by_id(&state.pool, agent_id)
        .await?
        .filter(|u| u.role == ROLE_AGENT)
        .ok_or(AppError::Core(CoreError::not_found("Agent", agent_id)))?;
    check_order(&state, input.order_id, agent.id).await?;

    let sender = UserRepo::find_by_id(&state.pool, admin.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::Unauthorized(
            "User no longer exists".into(),
        )))?;

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            order_id: input.order_id,
            agent_id: agent.id,
            sender_id: sender.id,
            sender_name: sender.name,
            content: input.content,
            is_admin: true,
        },
    )
    .await?;

    tracing::info!(
        message_id = message.id,
        agent_id,
        user_id = admin.user_id,
        "Support reply sent"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}
