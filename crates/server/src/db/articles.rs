//! Article repository for database operations.

use chrono::Utc;
use legal_intake_core::{ArticleId, Language};
use sqlx::SqlitePool;

use super::{RepositoryError, conflict_or_database};
use crate::models::Article;

const ARTICLE_COLUMNS: &str = "id, title, slug, content, excerpt, language, category, \
     is_published, meta_title, meta_description, created_at, updated_at";

/// Fields for a new article.
#[derive(Debug)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub language: Language,
    pub category: Option<String>,
    pub is_published: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Partial update applied by staff. The slug is immutable after creation.
#[derive(Debug, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub is_published: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

impl ArticleChanges {
    /// Whether no field was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.category.is_none()
            && self.is_published.is_none()
            && self.meta_title.is_none()
            && self.meta_description.is_none()
    }
}

/// Repository for article database operations.
pub struct ArticleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ArticleRepository<'a> {
    /// Create a new article repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List published articles for one language, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(
        &self,
        language: Language,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, RepositoryError> {
        let articles = if let Some(category) = category {
            sqlx::query_as::<_, Article>(&format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles
                 WHERE is_published = 1 AND language = ?1 AND category = ?2
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3 OFFSET ?4"
            ))
            .bind(language)
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Article>(&format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles
                 WHERE is_published = 1 AND language = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3"
            ))
            .bind(language)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?
        };

        Ok(articles)
    }

    /// Fetch a published article by slug.
    ///
    /// Unpublished articles are invisible here regardless of slug match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Article>, RepositoryError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles
             WHERE slug = ?1 AND is_published = 1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(article)
    }

    /// Distinct categories among published articles of one language.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn published_categories(
        &self,
        language: Language,
    ) -> Result<Vec<String>, RepositoryError> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM articles
             WHERE is_published = 1 AND language = ?1 AND category IS NOT NULL
             ORDER BY category",
        )
        .bind(language)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Staff listing: all articles regardless of publish state, with
    /// optional language and publish-flag filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(
        &self,
        language: Option<Language>,
        is_published: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, RepositoryError> {
        // Both filters are equality checks, so NULL-means-unfiltered folds
        // into COALESCE against the column itself.
        let articles = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles
             WHERE language = COALESCE(?1, language)
               AND is_published = COALESCE(?2, is_published)
             ORDER BY created_at DESC, id DESC
             LIMIT ?3 OFFSET ?4"
        ))
        .bind(language)
        .bind(is_published)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(articles)
    }

    /// Get an article by its ID, with no publish restriction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ArticleId) -> Result<Option<Article>, RepositoryError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(article)
    }

    /// Create a new article.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, article: &NewArticle) -> Result<Article, RepositoryError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Article>(&format!(
            "INSERT INTO articles
                 (title, slug, content, excerpt, language, category, is_published,
                  meta_title, meta_description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(article.excerpt.as_deref())
        .bind(article.language)
        .bind(article.category.as_deref())
        .bind(article.is_published)
        .bind(article.meta_title.as_deref())
        .bind(article.meta_description.as_deref())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "article with this slug already exists"))?;

        Ok(created)
    }

    /// Apply a partial update; only supplied fields change, `updated_at`
    /// refreshes. An empty update returns the row unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the article doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ArticleId,
        changes: &ArticleChanges,
    ) -> Result<Article, RepositoryError> {
        if changes.is_empty() {
            return self.get(id).await?.ok_or(RepositoryError::NotFound);
        }

        let article = sqlx::query_as::<_, Article>(&format!(
            "UPDATE articles
             SET title = COALESCE(?1, title),
                 content = COALESCE(?2, content),
                 excerpt = COALESCE(?3, excerpt),
                 category = COALESCE(?4, category),
                 is_published = COALESCE(?5, is_published),
                 meta_title = COALESCE(?6, meta_title),
                 meta_description = COALESCE(?7, meta_description),
                 updated_at = ?8
             WHERE id = ?9
             RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.excerpt.as_deref())
        .bind(changes.category.as_deref())
        .bind(changes.is_published)
        .bind(changes.meta_title.as_deref())
        .bind(changes.meta_description.as_deref())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(article)
    }

    /// Hard-delete an article.
    ///
    /// # Returns
    ///
    /// Returns `true` if the article was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ArticleId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
