//! Ticket repository for database operations.

use chrono::Utc;
use legal_intake_core::{Email, TicketId, TicketStatus};
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::Ticket;

/// Content fields accepted from the public submission endpoint.
///
/// Status is deliberately absent: every persisted ticket starts `New`
/// regardless of what the client sent.
#[derive(Debug)]
pub struct NewTicket {
    pub client_name: String,
    pub client_email: Email,
    pub client_phone: String,
    pub event_summary: String,
    pub urgency_level: String,
}

/// Partial update applied by staff.
#[derive(Debug, Default)]
pub struct TicketChanges {
    pub status: Option<TicketStatus>,
    pub urgency_level: Option<String>,
}

impl TicketChanges {
    /// Whether no field was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.urgency_level.is_none()
    }
}

/// Repository for ticket database operations.
pub struct TicketRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TicketRepository<'a> {
    /// Create a new ticket repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new ticket with status forced to `New`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, ticket: &NewTicket) -> Result<Ticket, RepositoryError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets
                 (client_name, client_email, client_phone, event_summary,
                  urgency_level, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, client_name, client_email, client_phone, event_summary,
                       urgency_level, status, created_at, updated_at",
        )
        .bind(&ticket.client_name)
        .bind(&ticket.client_email)
        .bind(&ticket.client_phone)
        .bind(&ticket.event_summary)
        .bind(&ticket.urgency_level)
        .bind(TicketStatus::New)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// List tickets, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ticket>, RepositoryError> {
        let tickets = if let Some(status) = status {
            sqlx::query_as::<_, Ticket>(
                "SELECT id, client_name, client_email, client_phone, event_summary,
                        urgency_level, status, created_at, updated_at
                 FROM tickets
                 WHERE status = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3",
            )
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Ticket>(
                "SELECT id, client_name, client_email, client_phone, event_summary,
                        urgency_level, status, created_at, updated_at
                 FROM tickets
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1 OFFSET ?2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?
        };

        Ok(tickets)
    }

    /// Get a ticket by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: TicketId) -> Result<Option<Ticket>, RepositoryError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "SELECT id, client_name, client_email, client_phone, event_summary,
                    urgency_level, status, created_at, updated_at
             FROM tickets WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(ticket)
    }

    /// Apply a partial update; only supplied fields change, `updated_at`
    /// refreshes. An empty update returns the row unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ticket doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: TicketId,
        changes: &TicketChanges,
    ) -> Result<Ticket, RepositoryError> {
        if changes.is_empty() {
            return self.get(id).await?.ok_or(RepositoryError::NotFound);
        }

        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets
             SET status = COALESCE(?1, status),
                 urgency_level = COALESCE(?2, urgency_level),
                 updated_at = ?3
             WHERE id = ?4
             RETURNING id, client_name, client_email, client_phone, event_summary,
                       urgency_level, status, created_at, updated_at",
        )
        .bind(changes.status)
        .bind(changes.urgency_level.as_deref())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(ticket)
    }

    /// Hard-delete a ticket.
    ///
    /// # Returns
    ///
    /// Returns `true` if the ticket was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: TicketId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
