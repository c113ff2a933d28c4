//! Blog routes.
//!
//! Public endpoints only ever expose published content; the `/admin`
//! endpoints manage the full catalog.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use legal_intake_core::{ArticleId, Language};

use crate::db::articles::{ArticleChanges, ArticleRepository, NewArticle};
use crate::error::{AppError, Result};
use crate::middleware::AdminUser;
use crate::models::Article;
use crate::state::AppState;

/// Default page size for the public listing.
const DEFAULT_PUBLIC_LIMIT: i64 = 10;

/// Default page size for the admin listing.
const DEFAULT_ADMIN_LIMIT: i64 = 50;

/// Public listing filters.
#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub language: Option<Language>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Language filter for the category listing.
#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    pub language: Option<Language>,
}

/// Admin listing filters.
#[derive(Debug, Deserialize)]
pub struct AdminListArticlesQuery {
    pub language: Option<Language>,
    pub is_published: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request to create an article.
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub language: Option<Language>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub is_published: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Published articles, newest first.
///
/// GET /blog/articles
pub async fn list_published(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<Vec<Article>>> {
    let (limit, offset) = super::page(query.limit, query.offset, DEFAULT_PUBLIC_LIMIT);
    let articles = ArticleRepository::new(state.pool())
        .list_published(
            query.language.unwrap_or_default(),
            query.category.as_deref(),
            limit,
            offset,
        )
        .await?;

    Ok(Json(articles))
}

/// Published article by slug.
///
/// GET /blog/articles/{slug}
pub async fn show_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Article>> {
    let article = ArticleRepository::new(state.pool())
        .get_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_owned()))?;

    Ok(Json(article))
}

/// Distinct categories among published articles.
///
/// GET /blog/categories
pub async fn categories(
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Json<Vec<String>>> {
    let categories = ArticleRepository::new(state.pool())
        .published_categories(query.language.unwrap_or_default())
        .await?;

    Ok(Json(categories))
}

/// All articles regardless of publish state.
///
/// GET /blog/admin/articles
pub async fn list_all(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<AdminListArticlesQuery>,
) -> Result<Json<Vec<Article>>> {
    let (limit, offset) = super::page(query.limit, query.offset, DEFAULT_ADMIN_LIMIT);
    let articles = ArticleRepository::new(state.pool())
        .list_all(query.language, query.is_published, limit, offset)
        .await?;

    Ok(Json(articles))
}

/// Create an article.
///
/// POST /blog/admin/articles
#[instrument(skip(state, request), fields(slug = %request.slug))]
pub async fn create(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(request): Json<CreateArticleRequest>,
) -> Result<Json<Article>> {
    let title = require_trimmed(&request.title, "title")?;
    let content = require_trimmed(&request.content, "content")?;
    let slug = validate_slug(&request.slug)?;

    let new_article = NewArticle {
        title,
        slug,
        content,
        excerpt: request.excerpt,
        language: request.language.unwrap_or_default(),
        category: request.category,
        is_published: request.is_published,
        meta_title: request.meta_title,
        meta_description: request.meta_description,
    };

    let article = ArticleRepository::new(state.pool()).create(&new_article).await?;

    tracing::info!(article_id = %article.id, "article created");

    Ok(Json(article))
}

/// Article detail without publish restriction.
///
/// GET /blog/admin/articles/{id}
pub async fn show(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<ArticleId>,
) -> Result<Json<Article>> {
    let article = ArticleRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_owned()))?;

    Ok(Json(article))
}

/// Partial update.
///
/// PUT /blog/admin/articles/{id}
#[instrument(skip(state, request), fields(article_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<ArticleId>,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<Article>> {
    let changes = ArticleChanges {
        title: request.title,
        content: request.content,
        excerpt: request.excerpt,
        category: request.category,
        is_published: request.is_published,
        meta_title: request.meta_title,
        meta_description: request.meta_description,
    };

    let article = ArticleRepository::new(state.pool()).update(id, &changes).await?;

    Ok(Json(article))
}

/// Delete an article.
///
/// DELETE /blog/admin/articles/{id}
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<ArticleId>,
) -> Result<Json<Value>> {
    let deleted = ArticleRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Article not found".to_owned()));
    }

    Ok(Json(json!({ "message": "Article deleted successfully" })))
}

/// Reject empty or whitespace-only input, returning the trimmed value.
fn require_trimmed(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Slugs are lowercase ASCII alphanumerics and hyphens, non-empty.
fn validate_slug(slug: &str) -> Result<String> {
    let trimmed = slug.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::Validation(
            "slug must contain only lowercase letters, digits and hyphens".to_owned(),
        ));
    }
    Ok(trimmed.to_owned())
}
