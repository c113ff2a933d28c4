//! Integration tests for chat visibility and the client roster.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use legal_intake_integration_tests::{
    create_admin_and_login, register_and_login, send, test_app,
};

const GOOD_PASSWORD: &str = "Abcdef1!";

async fn post_message(app: &axum::Router, token: &str, body: Value) -> Value {
    let (status, message) = send(app, "POST", "/chat/messages", Some(body), Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    message
}

fn texts(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn clients_see_own_thread_plus_staff_messages_only() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;
    let alice = register_and_login(&app, "alice@example.com", GOOD_PASSWORD).await;
    let bob = register_and_login(&app, "bob@example.com", GOOD_PASSWORD).await;

    post_message(&app, &alice, json!({ "message": "from alice" })).await;
    post_message(&app, &bob, json!({ "message": "from bob" })).await;
    post_message(&app, &admin, json!({ "message": "staff notice" })).await;

    let (_, alice_view) = send(&app, "GET", "/chat/messages", None, Some(&alice)).await;
    assert_eq!(texts(&alice_view), vec!["from alice", "staff notice"]);

    let (_, bob_view) = send(&app, "GET", "/chat/messages", None, Some(&bob)).await;
    assert_eq!(texts(&bob_view), vec!["from bob", "staff notice"]);

    // Admin with no thread selected sees everything, oldest first.
    let (_, admin_view) = send(&app, "GET", "/chat/messages", None, Some(&admin)).await;
    assert_eq!(
        texts(&admin_view),
        vec!["from alice", "from bob", "staff notice"]
    );
}

#[tokio::test]
async fn admin_can_read_a_specific_thread() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;
    let alice = register_and_login(&app, "alice@example.com", GOOD_PASSWORD).await;
    let _bob = register_and_login(&app, "bob@example.com", GOOD_PASSWORD).await;

    let first = post_message(&app, &alice, json!({ "message": "hello" })).await;
    let alice_id = first["user_id"].as_i64().unwrap();

    // Staff replies reach alice through the staff flag, not through a
    // reattributed user reference.
    let reply = post_message(&app, &admin, json!({ "message": "how can we help" })).await;
    assert_eq!(reply["is_from_admin"], true);

    let (_, thread) = send(
        &app,
        "GET",
        &format!("/chat/messages?user_id={alice_id}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(texts(&thread), vec!["hello", "how can we help"]);
}

#[tokio::test]
async fn messages_are_attributed_to_their_sender() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;
    let alice = register_and_login(&app, "alice@example.com", GOOD_PASSWORD).await;

    let (_, alice_profile) = send(&app, "GET", "/auth/me", None, Some(&alice)).await;
    let (_, admin_profile) = send(&app, "GET", "/auth/me", None, Some(&admin)).await;

    // A client cannot forge the staff flag or the attribution.
    let message = post_message(
        &app,
        &alice,
        json!({ "message": "spoof", "is_from_admin": true, "user_id": 999 }),
    )
    .await;
    assert_eq!(message["is_from_admin"], false);
    assert_eq!(message["user_id"], alice_profile["id"]);

    // Staff messages carry the staff author's id, even if the request
    // tries to pin them on a client.
    let reply = post_message(
        &app,
        &admin,
        json!({ "message": "reply", "user_id": alice_profile["id"] }),
    )
    .await;
    assert_eq!(reply["is_from_admin"], true);
    assert_eq!(reply["user_id"], admin_profile["id"]);
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let (app, _pool) = test_app().await;
    let alice = register_and_login(&app, "alice@example.com", GOOD_PASSWORD).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat/messages",
        Some(json!({ "message": "   " })),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn mark_read_enforces_ownership() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;
    let alice = register_and_login(&app, "alice@example.com", GOOD_PASSWORD).await;
    let bob = register_and_login(&app, "bob@example.com", GOOD_PASSWORD).await;

    let message = post_message(&app, &alice, json!({ "message": "unread" })).await;
    let id = message["id"].as_i64().unwrap();
    assert_eq!(message["status"], "sent");

    // Another client may not touch it.
    let (forbidden, _) = send(
        &app,
        "PUT",
        &format!("/chat/messages/{id}/read"),
        None,
        Some(&bob),
    )
    .await;
    assert_eq!(forbidden, StatusCode::FORBIDDEN);

    // The owner may.
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/chat/messages/{id}/read"),
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "read");

    // Admins may too, and a missing message is 404.
    let (admin_status, _) = send(
        &app,
        "PUT",
        &format!("/chat/messages/{id}/read"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(admin_status, StatusCode::OK);

    let (missing, _) = send(
        &app,
        "PUT",
        "/chat/messages/9999/read",
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clients_cannot_mark_staff_messages_read() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;
    let alice = register_and_login(&app, "alice@example.com", GOOD_PASSWORD).await;

    let notice = post_message(&app, &admin, json!({ "message": "staff notice" })).await;
    let id = notice["id"].as_i64().unwrap();

    // Alice sees the staff message but does not own it.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/chat/messages/{id}/read"),
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (admin_status, updated) = send(
        &app,
        "PUT",
        &format!("/chat/messages/{id}/read"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(admin_status, StatusCode::OK);
    assert_eq!(updated["status"], "read");
}

#[tokio::test]
async fn dangling_user_references_are_rejected() {
    let (_app, pool) = test_app().await;

    let result = sqlx::query(
        "INSERT INTO chat_messages (message, user_id, is_from_admin, status, created_at)
         VALUES ('orphan', 9999, 0, 'sent', '2026-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "foreign keys should be enforced");
}

#[tokio::test]
async fn roster_is_admin_only_and_ordered_by_recency() {
    let (app, _pool) = test_app().await;
    let admin = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;
    let alice = register_and_login(&app, "alice@example.com", GOOD_PASSWORD).await;
    let bob = register_and_login(&app, "bob@example.com", GOOD_PASSWORD).await;
    let _quiet = register_and_login(&app, "quiet@example.com", GOOD_PASSWORD).await;

    post_message(&app, &alice, json!({ "message": "one" })).await;
    post_message(&app, &alice, json!({ "message": "two" })).await;
    post_message(&app, &bob, json!({ "message": "three" })).await;

    let (status, roster) = send(&app, "GET", "/chat/users", None, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let entries = roster.as_array().unwrap();
    // Only clients who have messaged appear; bob messaged most recently.
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["email"], "bob@example.com");
    assert_eq!(entries[0]["message_count"].as_i64().unwrap(), 1);
    assert_eq!(entries[1]["email"], "alice@example.com");
    assert_eq!(entries[1]["message_count"].as_i64().unwrap(), 2);

    let (forbidden, _) = send(&app, "GET", "/chat/users", None, Some(&alice)).await;
    assert_eq!(forbidden, StatusCode::FORBIDDEN);
}
