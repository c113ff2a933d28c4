//! Chat message repository and visibility filtering.

use chrono::Utc;
use legal_intake_core::{ChatMessageId, MessageStatus, UserId};
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::{ChatMessage, ChatUserSummary};

/// Which slice of the conversation a caller may read.
///
/// Computed once at the access-control boundary from the caller's role;
/// the repository never inspects roles itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageScope {
    /// One user's own messages plus every staff-flagged broadcast.
    Thread(UserId),
    /// No filter at all (staff browsing without a preselected user).
    Unrestricted,
}

/// Repository for chat message database operations.
pub struct ChatRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ChatRepository<'a> {
    /// Create a new chat repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new message.
    ///
    /// The staff flag is derived by the caller from the sender's role at
    /// write time; it is never client-supplied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        message: &str,
        user_id: Option<UserId>,
        is_from_admin: bool,
    ) -> Result<ChatMessage, RepositoryError> {
        let created = sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_messages (message, user_id, is_from_admin, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, message, user_id, is_from_admin, status, created_at",
        )
        .bind(message)
        .bind(user_id)
        .bind(is_from_admin)
        .bind(MessageStatus::Sent)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// List messages visible within `scope`, in conversation order
    /// (ascending by creation time).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        scope: MessageScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = match scope {
            MessageScope::Thread(user_id) => {
                sqlx::query_as::<_, ChatMessage>(
                    "SELECT id, message, user_id, is_from_admin, status, created_at
                     FROM chat_messages
                     WHERE user_id = ?1 OR is_from_admin = 1
                     ORDER BY created_at ASC, id ASC
                     LIMIT ?2 OFFSET ?3",
                )
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool)
                .await?
            }
            MessageScope::Unrestricted => {
                sqlx::query_as::<_, ChatMessage>(
                    "SELECT id, message, user_id, is_from_admin, status, created_at
                     FROM chat_messages
                     ORDER BY created_at ASC, id ASC
                     LIMIT ?1 OFFSET ?2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(messages)
    }

    /// Get a message by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: ChatMessageId,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let message = sqlx::query_as::<_, ChatMessage>(
            "SELECT id, message, user_id, is_from_admin, status, created_at
             FROM chat_messages WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(message)
    }

    /// Mark a message as read.
    ///
    /// # Returns
    ///
    /// Returns `true` if the row was updated, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_read(&self, id: ChatMessageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE chat_messages SET status = ?1 WHERE id = ?2")
            .bind(MessageStatus::Read)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// For each client who has ever sent a message: message count and most
    /// recent message time, ordered by recency.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn client_roster(&self) -> Result<Vec<ChatUserSummary>, RepositoryError> {
        let roster = sqlx::query_as::<_, ChatUserSummary>(
            "SELECT u.id, u.full_name, u.email,
                    COUNT(cm.id) AS message_count,
                    MAX(cm.created_at) AS last_message_at
             FROM users u
             JOIN chat_messages cm ON u.id = cm.user_id
             WHERE u.role = 'client'
             GROUP BY u.id, u.full_name, u.email
             ORDER BY last_message_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(roster)
    }
}
