//! Shared helpers for the HTTP API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::COOKIE;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use gnubridge::auth::double_sha1_hash;
use gnubridge::web::{create_router, AppState};
use gnubridge::{Config, Database, ExternalClaims, Member, MemberRepository, NewMember, TokenAuthority};

pub const INTERNAL_SECRET: &str = "integration-internal-secret";
pub const EXTERNAL_SECRET: &str = "integration-legacy-secret";
pub const LEGACY_COOKIE: &str = "damoang_jwt";

/// Configuration used by every test server.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.jwt.secret = INTERNAL_SECRET.to_string();
    config.jwt.external_secret = EXTERNAL_SECRET.to_string();
    config.jwt.external_cookie_name = LEGACY_COOKIE.to_string();
    config
}

/// Test server over a fresh in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let server = server_for(db.clone());
    (server, db)
}

/// Test server over an existing database.
pub fn server_for(db: Database) -> TestServer {
    let state = Arc::new(AppState::new(db, &test_config()));
    let router = create_router(state, &[]);
    TestServer::new(router).expect("Failed to create test server")
}

/// Insert a member whose password is stored in the double-SHA1 format.
pub async fn seed_member(db: &Database, mb_id: &str, password: &str, level: i64) -> Member {
    let member = NewMember::new(mb_id, double_sha1_hash(password), format!("{mb_id}-nick"))
        .with_level(level)
        .with_email(format!("{mb_id}@example.com"));
    MemberRepository::new(db.pool())
        .create(&member)
        .await
        .expect("Failed to seed member")
}

/// Mint an internal access token without going through login.
pub fn access_token(mb_id: &str, level: i64) -> String {
    TokenAuthority::from_config(&test_config().jwt)
        .issue_access_token(mb_id, &format!("{mb_id}-nick"), level)
        .expect("Failed to issue access token")
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

/// Sign a legacy cookie token the way the legacy site would.
pub fn legacy_token(mb_id: &str, level: i64) -> String {
    legacy_token_with_secret(mb_id, level, EXTERNAL_SECRET)
}

pub fn legacy_token_with_secret(mb_id: &str, level: i64, secret: &str) -> String {
    let claims = ExternalClaims {
        member_id: mb_id.to_string(),
        name: format!("{mb_id} name"),
        level,
        email: format!("{mb_id}@legacy.example.com"),
        exp: now_secs() + 3600,
        iat: Some(now_secs()),
        nbf: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign legacy token")
}

/// `Cookie` header carrying a legacy token.
pub fn legacy_cookie(token: &str) -> (HeaderName, HeaderValue) {
    (
        COOKIE,
        HeaderValue::from_str(&format!("{LEGACY_COOKIE}={token}")).expect("valid cookie header"),
    )
}

/// Create a board through the API as an administrator.
pub async fn create_board(server: &TestServer, admin_token: &str, board_id: &str) -> Value {
    create_board_with(server, admin_token, json!({
        "board_id": board_id,
        "group_id": "community",
        "subject": format!("{board_id} board"),
    }))
    .await
}

pub async fn create_board_with(server: &TestServer, admin_token: &str, body: Value) -> Value {
    let response = server
        .post("/api/v2/boards")
        .authorization_bearer(admin_token)
        .json(&body)
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()
}

/// Create a post and return its `data` object.
pub async fn create_post(server: &TestServer, token: &str, board_id: &str, title: &str) -> Value {
    let response = server
        .post(&format!("/api/v2/boards/{board_id}/posts"))
        .authorization_bearer(token)
        .json(&json!({ "title": title, "content": format!("{title} body") }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()["data"].clone()
}
