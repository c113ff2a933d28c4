//! Intake ticket record.

use chrono::{DateTime, Utc};
use legal_intake_core::{Email, TicketId, TicketStatus};
use serde::Serialize;

/// A client-submitted intake ticket.
///
/// Created only by the public submission endpoint; mutated only by staff.
/// `updated_at` refreshes on every mutation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: TicketId,
    pub client_name: String,
    pub client_email: Email,
    pub client_phone: String,
    pub event_summary: String,
    pub urgency_level: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
