//! Published content record.

use chrono::{DateTime, Utc};
use legal_intake_core::{ArticleId, Language};
use serde::Serialize;

/// A publishable content unit.
///
/// The slug is the stable external identifier; the numeric id is internal
/// to the admin surface. Publicly visible only while `is_published` is true.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub language: Language,
    pub category: Option<String>,
    pub is_published: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
