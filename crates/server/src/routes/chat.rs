//! Chat routes.
//!
//! Clients see their own thread (their messages plus all staff messages);
//! admins see any thread, or everything when no thread is selected.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use legal_intake_core::{ChatMessageId, UserId};

use crate::db::chat::{ChatRepository, MessageScope};
use crate::error::{AppError, Result};
use crate::middleware::{AdminUser, CurrentUser};
use crate::models::{ChatMessage, ChatUserSummary};
use crate::state::AppState;

/// Default page size for message listings.
const DEFAULT_LIST_LIMIT: i64 = 50;

/// Request to send a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Message listing filters.
#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    /// Thread to read. Only honored for admins.
    pub user_id: Option<UserId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Send a chat message.
///
/// POST /chat/messages
///
/// The message is attributed to the sender; the staff flag comes from
/// the sender's role, never from the request body.
#[instrument(skip(state, request), fields(sender_id = %user.id))]
pub async fn send(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ChatMessage>> {
    let text = request.message.trim();
    if text.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_owned()));
    }

    let message = ChatRepository::new(state.pool())
        .create(text, Some(user.id), user.role.is_admin())
        .await?;

    Ok(Json(message))
}

/// List visible messages in conversation order.
///
/// GET /chat/messages
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<ChatMessage>>> {
    let scope = if user.role.is_admin() {
        query.user_id.map_or(MessageScope::Unrestricted, MessageScope::Thread)
    } else {
        MessageScope::Thread(user.id)
    };

    let (limit, offset) = super::page(query.limit, query.offset, DEFAULT_LIST_LIMIT);
    let messages = ChatRepository::new(state.pool())
        .list(scope, limit, offset)
        .await?;

    Ok(Json(messages))
}

/// Mark a message as read.
///
/// PUT /chat/messages/{id}/read
///
/// Allowed for admins and for the message's own sender.
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<ChatMessageId>,
) -> Result<Json<ChatMessage>> {
    let repo = ChatRepository::new(state.pool());

    let message = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".to_owned()))?;

    if !user.role.is_admin() && message.user_id != Some(user.id) {
        return Err(AppError::Forbidden);
    }

    repo.mark_read(id).await?;

    let updated = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".to_owned()))?;

    Ok(Json(updated))
}

/// Clients with chat activity, most recently active first.
///
/// GET /chat/users
pub async fn roster(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<ChatUserSummary>>> {
    let roster = ChatRepository::new(state.pool()).client_roster().await?;

    Ok(Json(roster))
}
