//! Shared vocabulary types for the intake backend.

mod email;
mod id;
mod language;
mod role;
mod status;

pub use email::{Email, EmailError};
pub use id::{ArticleId, ChatMessageId, TicketId, UserId};
pub use language::Language;
pub use role::Role;
pub use status::{MessageStatus, TicketStatus};
