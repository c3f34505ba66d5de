//! Web API Correspondence Tests
//!
//! Integration tests for correspondence and message endpoints.

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use socialnet::web::handlers::AppState;
use socialnet::web::middleware::{JwtClaims, JwtState};
use socialnet::web::router::{create_health_router, create_router};
use socialnet::{Database, NewUser, UserRepository};
use std::sync::Arc;

const SECRET: &str = "test-secret-key-for-testing-only";

/// Create a test server with an in-memory database and `users` seeded users.
async fn create_test_server(users: usize) -> (TestServer, Vec<i64>) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let repo = UserRepository::new(db.pool());
    let mut ids = Vec::with_capacity(users);
    for i in 1..=users {
        let user = repo
            .create(&NewUser::new(
                format!("User{i}"),
                "Test",
                format!("user{i}@example.com"),
            ))
            .await
            .expect("Failed to seed user");
        ids.push(user.id);
    }

    let app_state = Arc::new(AppState::new(db));
    let jwt_state = Arc::new(JwtState::new(SECRET));
    let router = create_router(app_state, jwt_state, &[]).merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, ids)
}

/// Issue a bearer token for a user.
fn token_for(user_id: i64) -> String {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = JwtClaims {
        sub: user_id,
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

/// Start a correspondence as `creator` and return its id.
async fn start(server: &TestServer, creator: i64, participants: &[i64], text: &str) -> i64 {
    let response = server
        .post("/api/correspondences")
        .add_header(AUTHORIZATION, token_for(creator))
        .json(&json!({
            "name": "Group",
            "message": { "text": text },
            "participant_ids": participants,
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["id"].as_i64().unwrap()
}

fn user_ids(body: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = body["data"]["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    ids
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (server, _) = create_test_server(0).await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_missing_token_unauthorized() {
    let (server, _) = create_test_server(1).await;
    let response = server.get("/api/correspondences").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_unauthorized() {
    let (server, _) = create_test_server(1).await;
    let response = server
        .get("/api/correspondences")
        .add_header(AUTHORIZATION, "Bearer not-a-token")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Start / List / Get
// ============================================================================

#[tokio::test]
async fn test_start_correspondence_scenario() {
    let (server, ids) = create_test_server(3).await;

    let response = server
        .post("/api/correspondences")
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({
            "name": "G",
            "message": { "text": "hello" },
            "participant_ids": [ids[1], ids[2]],
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "G");
    assert_eq!(user_ids(&body), vec![ids[0], ids[1], ids[2]]);

    let id = body["data"]["id"].as_i64().unwrap();
    let response = server
        .get(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["admin"]["id"], ids[0]);
    let messages = body["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["text"], "hello");
    assert_eq!(messages[0]["sender"]["id"], ids[0]);
    assert_eq!(messages[0]["is_edited"], false);
}

#[tokio::test]
async fn test_start_with_duplicate_participants() {
    let (server, ids) = create_test_server(2).await;

    let response = server
        .post("/api/correspondences")
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({
            "name": "G",
            "message": { "text": "hi" },
            "participant_ids": [ids[1], ids[1]],
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_with_unknown_participant() {
    let (server, ids) = create_test_server(1).await;

    let response = server
        .post("/api/correspondences")
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({
            "name": "G",
            "message": { "text": "hi" },
            "participant_ids": [999],
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_validation_error() {
    let (server, ids) = create_test_server(1).await;

    let response = server
        .post("/api/correspondences")
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({
            "name": "n".repeat(51),
            "message": { "text": "hi" },
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["name"].is_array());
}

#[tokio::test]
async fn test_start_with_too_many_participants() {
    let (server, ids) = create_test_server(1).await;
    let participants: Vec<i64> = (1000..1101).collect();

    let response = server
        .post("/api/correspondences")
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({
            "name": "G",
            "message": { "text": "hi" },
            "participant_ids": participants,
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert!(body["error"]["details"]["participant_ids"].is_array());
}

#[tokio::test]
async fn test_list_correspondences() {
    let (server, ids) = create_test_server(3).await;
    start(&server, ids[0], &[ids[1]], "a").await;
    start(&server, ids[2], &[], "b").await;

    let response = server
        .get("/api/correspondences")
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_as_non_member_not_found() {
    let (server, ids) = create_test_server(4).await;
    let id = start(&server, ids[0], &[ids[1], ids[2]], "hello").await;

    let response = server
        .get(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[3]))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let missing = server
        .get("/api/correspondences/9999")
        .add_header(AUTHORIZATION, token_for(ids[3]))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        missing.json::<Value>()["error"]["code"]
    );
}

// ============================================================================
// Admin operations
// ============================================================================

#[tokio::test]
async fn test_edit_by_non_admin_rejected() {
    let (server, ids) = create_test_server(2).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;

    let response = server
        .put(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .json(&json!({ "name": "NewName" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = server
        .get(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await
        .json();
    assert_eq!(body["data"]["name"], "Group");
}

#[tokio::test]
async fn test_edit_by_admin() {
    let (server, ids) = create_test_server(2).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;

    let response = server
        .put(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({ "name": "NewName" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "NewName");
    assert_eq!(user_ids(&body), vec![ids[0], ids[1]]);
}

#[tokio::test]
async fn test_add_and_remove_user() {
    let (server, ids) = create_test_server(3).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;
    let path = format!("/api/correspondences/{}/users/{}", id, ids[2]);

    let added = server
        .post(&path)
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    added.assert_status_ok();
    assert_eq!(user_ids(&added.json()), vec![ids[0], ids[1], ids[2]]);

    let again = server
        .post(&path)
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    again.assert_status(StatusCode::BAD_REQUEST);

    let removed = server
        .delete(&path)
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    removed.assert_status_ok();
    assert_eq!(user_ids(&removed.json()), vec![ids[0], ids[1]]);
}

#[tokio::test]
async fn test_add_user_by_non_admin_rejected() {
    let (server, ids) = create_test_server(3).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;

    let response = server
        .post(&format!("/api/correspondences/{}/users/{}", id, ids[2]))
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_admin_rejected() {
    let (server, ids) = create_test_server(1).await;
    let id = start(&server, ids[0], &[], "hello").await;

    let response = server
        .delete(&format!("/api/correspondences/{}/users/{}", id, ids[0]))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_correspondence() {
    let (server, ids) = create_test_server(2).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;

    let denied = server
        .delete(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .await;
    denied.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .delete(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["id"], id);

    let gone = server
        .get(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    gone.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_send_message_as_member() {
    let (server, ids) = create_test_server(2).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;

    let response = server
        .post(&format!("/api/correspondences/{}/messages", id))
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .json(&json!({ "text": "reply" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["text"], "reply");
    assert_eq!(body["data"]["sender"]["id"], ids[1]);
    assert_eq!(body["data"]["is_edited"], false);
}

#[tokio::test]
async fn test_send_message_as_non_member_not_found() {
    let (server, ids) = create_test_server(4).await;
    let id = start(&server, ids[0], &[ids[1], ids[2]], "hello").await;

    let response = server
        .post(&format!("/api/correspondences/{}/messages", id))
        .add_header(AUTHORIZATION, token_for(ids[3]))
        .json(&json!({ "text": "hi" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_message_scenario() {
    let (server, ids) = create_test_server(2).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;

    let sent: Value = server
        .post(&format!("/api/correspondences/{}/messages", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({ "text": "v1" }))
        .await
        .json();
    let message_id = sent["data"]["id"].as_i64().unwrap();
    let path = format!("/api/correspondences/messages/{}", message_id);

    let response = server
        .put(&path)
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({ "text": "v2" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["text"], "v2");
    assert_eq!(body["data"]["is_edited"], true);
    assert_eq!(body["data"]["created_at"], sent["data"]["created_at"]);
    assert_eq!(body["data"]["sender"]["id"], ids[0]);

    let other = server
        .put(&path)
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .json(&json!({ "text": "v3" }))
        .await;
    other.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_message() {
    let (server, ids) = create_test_server(2).await;
    let id = start(&server, ids[0], &[ids[1]], "hello").await;

    let sent: Value = server
        .post(&format!("/api/correspondences/{}/messages", id))
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .json(&json!({ "text": "bye" }))
        .await
        .json();
    let path = format!(
        "/api/correspondences/messages/{}",
        sent["data"]["id"].as_i64().unwrap()
    );

    let denied = server
        .delete(&path)
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await;
    denied.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .delete(&path)
        .add_header(AUTHORIZATION, token_for(ids[1]))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["text"], "bye");

    let body: Value = server
        .get(&format!("/api/correspondences/{}", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .await
        .json();
    assert_eq!(body["data"]["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_send_empty_message_rejected() {
    let (server, ids) = create_test_server(1).await;
    let id = start(&server, ids[0], &[], "hello").await;

    let response = server
        .post(&format!("/api/correspondences/{}/messages", id))
        .add_header(AUTHORIZATION, token_for(ids[0]))
        .json(&json!({ "text": "   " }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
