//! Status enums for tickets and chat messages.

use serde::{Deserialize, Serialize};

/// Ticket lifecycle status.
///
/// Every transition between these values is permitted via the admin update
/// operation; there is no automatic progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
pub enum TicketStatus {
    /// Freshly submitted, not yet looked at by staff.
    #[default]
    New,
    /// Staff have reviewed the ticket.
    Reviewed,
    /// The ticket is resolved or abandoned.
    Closed,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Reviewed => write!(f, "Reviewed"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Read/sent status of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Delivered but not yet read by the recipient.
    #[default]
    Sent,
    /// Marked read by the recipient.
    Read,
}
