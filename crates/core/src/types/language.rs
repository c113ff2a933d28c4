//! Article language tags.

use serde::{Deserialize, Serialize};

/// Language tag for published articles.
///
/// The office publishes in Hebrew by default, with Russian and English
/// translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Hebrew.
    #[default]
    He,
    /// Russian.
    Ru,
    /// English.
    En,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::He => write!(f, "he"),
            Self::Ru => write!(f, "ru"),
            Self::En => write!(f, "en"),
        }
    }
}
