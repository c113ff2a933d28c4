//! Chat message records.

use chrono::{DateTime, Utc};
use legal_intake_core::{ChatMessageId, Email, MessageStatus, UserId};
use serde::Serialize;

/// A single turn in a client/staff conversation.
///
/// `user_id` may be NULL for staff-authored broadcasts not tied to one
/// account; `is_from_admin` is true whenever the message is staff-authored,
/// independent of whether a user reference is attached.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub message: String,
    pub user_id: Option<UserId>,
    pub is_from_admin: bool,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

/// Per-client aggregate for the staff chat roster.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatUserSummary {
    pub id: UserId,
    pub full_name: Option<String>,
    pub email: Email,
    pub message_count: i64,
    pub last_message_at: DateTime<Utc>,
}
