//! Database-backed domain models.

pub mod article;
pub mod chat;
pub mod ticket;
pub mod user;

pub use article::Article;
pub use chat::{ChatMessage, ChatUserSummary};
pub use ticket::Ticket;
pub use user::User;
