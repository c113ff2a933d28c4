//! Integration tests for the ticket intake workflow.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use secrecy::SecretString;
use serde_json::json;

use legal_intake_integration_tests::{
    create_admin_and_login, register_and_login, send, spawn_captcha_stub, test_app,
    test_app_with_config, test_config, ticket_body, unreachable_email_config,
};

const GOOD_PASSWORD: &str = "Abcdef1!";

async fn ticket_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn submission_without_captcha_secret_is_accepted() {
    // No secret configured: verification is skipped (logged fail-open).
    let (app, pool) = test_app().await;

    let (status, body) = send(&app, "POST", "/tickets/", Some(ticket_body("any")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "New");
    assert_eq!(body["client_email"], "dana@example.com");
    assert_eq!(ticket_count(&pool).await, 1);
}

#[tokio::test]
async fn rejected_captcha_persists_nothing() {
    let stub_url = spawn_captcha_stub(false).await;
    let mut config = test_config();
    config.captcha_secret = Some(SecretString::from("stub-captcha-secret"));
    config.captcha_siteverify_url = Some(stub_url);
    let (app, pool) = test_app_with_config(config).await;

    let (status, body) = send(&app, "POST", "/tickets/", Some(ticket_body("bad")), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Captcha"));
    assert_eq!(ticket_count(&pool).await, 0);
}

#[tokio::test]
async fn accepted_captcha_persists_ticket() {
    let stub_url = spawn_captcha_stub(true).await;
    let mut config = test_config();
    config.captcha_secret = Some(SecretString::from("stub-captcha-secret"));
    config.captcha_siteverify_url = Some(stub_url);
    let (app, pool) = test_app_with_config(config).await;

    let (status, _) = send(&app, "POST", "/tickets/", Some(ticket_body("ok")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket_count(&pool).await, 1);
}

#[tokio::test]
async fn failed_notifications_do_not_fail_submission() {
    // SMTP points at a closed port, so both notification sends fail.
    let mut config = test_config();
    config.email = Some(unreachable_email_config());
    let (app, pool) = test_app_with_config(config).await;

    let (status, body) = send(&app, "POST", "/tickets/", Some(ticket_body("any")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "New");
    assert!(body["created_at"].as_str().is_some());
    assert!(body["updated_at"].as_str().is_some());
    assert_eq!(ticket_count(&pool).await, 1);
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let (app, pool) = test_app().await;

    let mut body = ticket_body("any");
    body["client_name"] = json!("   ");

    let (status, response) = send(&app, "POST", "/tickets/", Some(body), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("client_name"));
    assert_eq!(ticket_count(&pool).await, 0);
}

#[tokio::test]
async fn submitted_status_is_ignored() {
    let (app, _pool) = test_app().await;

    let mut body = ticket_body("any");
    body["status"] = json!("Closed");

    let (status, response) = send(&app, "POST", "/tickets/", Some(body), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "New");
}

#[tokio::test]
async fn admin_list_is_newest_first_with_filter_and_pagination() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    for i in 0..3 {
        let mut body = ticket_body("any");
        body["client_name"] = json!(format!("Client {i}"));
        let (status, _) = send(&app, "POST", "/tickets/", Some(body), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, list) = send(&app, "GET", "/tickets/admin", None, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["client_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Client 2", "Client 1", "Client 0"]);

    // Pagination
    let (_, page) = send(
        &app,
        "GET",
        "/tickets/admin?limit=1&offset=1",
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["client_name"], "Client 1");

    // Mark one reviewed, then filter by status
    let id = list[0]["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/tickets/admin/{id}"),
        Some(json!({ "status": "Reviewed" })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, reviewed) = send(
        &app,
        "GET",
        "/tickets/admin?status=Reviewed",
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(reviewed.as_array().unwrap().len(), 1);
    assert_eq!(reviewed[0]["id"].as_i64().unwrap(), id);
}

#[tokio::test]
async fn negative_pagination_is_clamped() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    for _ in 0..2 {
        let (status, _) = send(&app, "POST", "/tickets/", Some(ticket_body("any")), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    // LIMIT -1 would mean "all rows" in SQLite; clamped it yields none.
    let (status, list) = send(&app, "GET", "/tickets/admin?limit=-1", None, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 0);

    // A negative offset behaves like no offset at all.
    let (status, list) = send(
        &app,
        "GET",
        "/tickets/admin?limit=10&offset=-5",
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn partial_update_preserves_unspecified_fields() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    let (_, created) = send(&app, "POST", "/tickets/", Some(ticket_body("any")), None).await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/tickets/admin/{id}"),
        Some(json!({ "status": "Reviewed" })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Reviewed");
    // Urgency untouched, creation time preserved, update time refreshed.
    assert_eq!(updated["urgency_level"], created["urgency_level"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn missing_ticket_is_not_found() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    let (get_status, _) = send(&app, "GET", "/tickets/admin/9999", None, Some(&admin)).await;
    assert_eq!(get_status, StatusCode::NOT_FOUND);

    let (put_status, _) = send(
        &app,
        "PUT",
        "/tickets/admin/9999",
        Some(json!({ "status": "Closed" })),
        Some(&admin),
    )
    .await;
    assert_eq!(put_status, StatusCode::NOT_FOUND);

    let (delete_status, _) =
        send(&app, "DELETE", "/tickets/admin/9999", None, Some(&admin)).await;
    assert_eq!(delete_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_ticket() {
    let (app, pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    let (_, created) = send(&app, "POST", "/tickets/", Some(ticket_body("any")), None).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/tickets/admin/{id}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted"));
    assert_eq!(ticket_count(&pool).await, 0);
}

#[tokio::test]
async fn admin_endpoints_reject_non_admins() {
    let (app, _pool) = test_app().await;

    let (anonymous, _) = send(&app, "GET", "/tickets/admin", None, None).await;
    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);

    let client = register_and_login(&app, "client@example.com", GOOD_PASSWORD).await;
    let (forbidden, _) = send(&app, "GET", "/tickets/admin", None, Some(&client)).await;
    assert_eq!(forbidden, StatusCode::FORBIDDEN);
}
