//! Integration tests for the article catalog.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use legal_intake_integration_tests::{
    create_admin_and_login, register_and_login, send, test_app,
};

const GOOD_PASSWORD: &str = "Abcdef1!";

fn article_body(slug: &str, published: bool) -> Value {
    json!({
        "title": format!("Title for {slug}"),
        "slug": slug,
        "content": "Full article content.",
        "excerpt": "Short summary.",
        "category": "family-law",
        "is_published": published,
    })
}

async fn create_article(app: &axum::Router, admin: &str, body: Value) -> Value {
    let (status, article) = send(app, "POST", "/blog/admin/articles", Some(body), Some(admin)).await;
    assert_eq!(status, StatusCode::OK);
    article
}

fn slugs(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|a| a["slug"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn public_listing_excludes_unpublished_and_other_languages() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    create_article(&app, &admin, article_body("published-he", true)).await;
    create_article(&app, &admin, article_body("draft-he", false)).await;
    let mut russian = article_body("published-ru", true);
    russian["language"] = json!("ru");
    create_article(&app, &admin, russian).await;

    // Default language is Hebrew.
    let (status, list) = send(&app, "GET", "/blog/articles", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&list), vec!["published-he"]);

    let (_, russian_list) = send(&app, "GET", "/blog/articles?language=ru", None, None).await;
    assert_eq!(slugs(&russian_list), vec!["published-ru"]);

    // Filters never surface drafts.
    let (_, filtered) = send(
        &app,
        "GET",
        "/blog/articles?category=family-law",
        None,
        None,
    )
    .await;
    assert_eq!(slugs(&filtered), vec!["published-he"]);
}

#[tokio::test]
async fn slug_lookup_serves_published_only() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    create_article(&app, &admin, article_body("visible", true)).await;
    create_article(&app, &admin, article_body("hidden", false)).await;

    let (found, article) = send(&app, "GET", "/blog/articles/visible", None, None).await;
    assert_eq!(found, StatusCode::OK);
    assert_eq!(article["slug"], "visible");

    // A draft behaves exactly like a missing article.
    let (draft, _) = send(&app, "GET", "/blog/articles/hidden", None, None).await;
    assert_eq!(draft, StatusCode::NOT_FOUND);

    let (missing, _) = send(&app, "GET", "/blog/articles/nope", None, None).await;
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn categories_are_distinct_and_published_only() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    create_article(&app, &admin, article_body("a", true)).await;
    create_article(&app, &admin, article_body("b", true)).await;
    let mut other = article_body("c", true);
    other["category"] = json!("labor-law");
    create_article(&app, &admin, other).await;
    let mut draft = article_body("d", false);
    draft["category"] = json!("draft-only-category");
    create_article(&app, &admin, draft).await;

    let (status, categories) = send(&app, "GET", "/blog/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        categories.as_array().unwrap(),
        &vec![json!("family-law"), json!("labor-law")]
    );
}

#[tokio::test]
async fn admin_listing_sees_drafts_and_filters() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    create_article(&app, &admin, article_body("live", true)).await;
    create_article(&app, &admin, article_body("draft", false)).await;

    let (status, all) = send(&app, "GET", "/blog/admin/articles", None, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, drafts) = send(
        &app,
        "GET",
        "/blog/admin/articles?is_published=false",
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(slugs(&drafts), vec!["draft"]);
}

#[tokio::test]
async fn duplicate_slug_conflicts_and_leaves_original_intact() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    let original = create_article(&app, &admin, article_body("taken", true)).await;

    let mut dup = article_body("taken", true);
    dup["title"] = json!("Usurper");
    let (status, body) = send(
        &app,
        "POST",
        "/blog/admin/articles",
        Some(dup),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("slug"));

    let id = original["id"].as_i64().unwrap();
    let (_, unchanged) = send(
        &app,
        "GET",
        &format!("/blog/admin/articles/{id}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(unchanged["title"], original["title"]);
}

#[tokio::test]
async fn invalid_slugs_are_rejected() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    for bad in ["", "Has Spaces", "UPPER", "a/b"] {
        let (status, _) = send(
            &app,
            "POST",
            "/blog/admin/articles",
            Some(article_body(bad, true)),
            Some(&admin),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "slug {bad:?}");
    }
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    let created = create_article(&app, &admin, article_body("editable", false)).await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/blog/admin/articles/{id}"),
        Some(json!({ "is_published": true, "title": "New Title" })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "New Title");
    assert_eq!(updated["is_published"], true);
    assert_eq!(updated["content"], created["content"]);
    assert_eq!(updated["slug"], "editable");
    assert_ne!(updated["updated_at"], created["updated_at"]);

    // Now visible publicly.
    let (public, _) = send(&app, "GET", "/blog/articles/editable", None, None).await;
    assert_eq!(public, StatusCode::OK);
}

#[tokio::test]
async fn delete_removes_article() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    let created = create_article(&app, &admin, article_body("doomed", true)).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/blog/admin/articles/{id}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (gone, _) = send(
        &app,
        "GET",
        &format!("/blog/admin/articles/{id}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(gone, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_endpoints_enforce_roles() {
    let (app, _pool) = test_app().await;

    let (anonymous, _) = send(&app, "GET", "/blog/admin/articles", None, None).await;
    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);

    let client = register_and_login(&app, "client@example.com", GOOD_PASSWORD).await;
    let (forbidden, _) = send(&app, "GET", "/blog/admin/articles", None, Some(&client)).await;
    assert_eq!(forbidden, StatusCode::FORBIDDEN);
}
