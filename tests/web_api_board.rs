//! Web API Board Tests
//!
//! Integration tests for board management endpoints.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_board_as_admin() {
    let (server, db) = create_test_server().await;
    let admin = access_token("admin", 10);

    let body = create_board(&server, &admin, "free").await;
    let board = &body["data"];
    assert_eq!(board["board_id"], "free");
    assert_eq!(board["group_id"], "community");
    assert_eq!(board["admin"], "admin");
    assert_eq!(board["list_level"], 1);
    assert_eq!(board["write_level"], 1);
    assert_eq!(board["page_rows"], 15);
    assert_eq!(board["count_write"], 0);

    assert!(db.table_exists("g5_write_free").await.unwrap());
}

#[tokio::test]
async fn test_create_board_with_options() {
    let (server, _db) = create_test_server().await;
    let admin = access_token("admin", 10);

    let body = create_board_with(
        &server,
        &admin,
        json!({
            "board_id": "notice",
            "group_id": "site",
            "subject": "Notices",
            "read_level": 2,
            "write_level": 9,
            "page_rows": 30
        }),
    )
    .await;
    assert_eq!(body["data"]["read_level"], 2);
    assert_eq!(body["data"]["write_level"], 9);
    assert_eq!(body["data"]["page_rows"], 30);
}

#[tokio::test]
async fn test_create_board_requires_token() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v2/boards")
        .json(&json!({ "board_id": "free", "group_id": "community", "subject": "Free" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_board_legacy_admin_cookie_is_not_enough() {
    let (server, _db) = create_test_server().await;
    let (name, value) = legacy_cookie(&legacy_token("root", 10));

    let response = server
        .post("/api/v2/boards")
        .add_header(name, value)
        .json(&json!({ "board_id": "free", "group_id": "community", "subject": "Free" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_board_forbidden_for_member() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v2/boards")
        .authorization_bearer(access_token("alice", 2))
        .json(&json!({ "board_id": "free", "group_id": "community", "subject": "Free" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_create_board_duplicate_conflicts() {
    let (server, _db) = create_test_server().await;
    let admin = access_token("admin", 10);
    create_board(&server, &admin, "free").await;

    let response = server
        .post("/api/v2/boards")
        .authorization_bearer(&admin)
        .json(&json!({ "board_id": "free", "group_id": "community", "subject": "Again" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_create_board_rejects_bad_identifier() {
    let (server, db) = create_test_server().await;
    let admin = access_token("admin", 10);

    for bad in ["a", "free;drop", "free_board", "abcdefghijklmnopqrstu"] {
        let response = server
            .post("/api/v2/boards")
            .authorization_bearer(&admin)
            .json(&json!({ "board_id": bad, "group_id": "community", "subject": "Bad" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "board_id {bad:?}");
        assert_eq!(response.json::<Value>()["error"]["code"], "BAD_REQUEST");
    }

    assert!(!db.table_exists("g5_write_free").await.unwrap());
}

#[tokio::test]
async fn test_create_board_rejects_level_out_of_range() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v2/boards")
        .authorization_bearer(access_token("admin", 10))
        .json(&json!({
            "board_id": "free",
            "group_id": "community",
            "subject": "Free",
            "write_level": 11
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_board() {
    let (server, _db) = create_test_server().await;
    create_board(&server, &access_token("admin", 10), "free").await;

    let response = server.get("/api/v2/boards/free").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["subject"], "free board");
}

#[tokio::test]
async fn test_get_board_not_found() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/v2/boards/missing").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_board_malformed_id() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/v2/boards/x").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_boards_paginates() {
    let (server, _db) = create_test_server().await;
    let admin = access_token("admin", 10);
    for id in ["aa", "bb", "cc"] {
        create_board(&server, &admin, id).await;
    }

    let response = server
        .get("/api/v2/boards")
        .add_query_param("page", 1)
        .add_query_param("page_size", 2)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 2);
    assert_eq!(body["meta"]["total"], 3);
    assert!(body["meta"].get("board_id").is_none());

    let second: Value = server
        .get("/api/v2/boards")
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .await
        .json();
    assert_eq!(second["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_boards_huge_page_is_empty() {
    let (server, _db) = create_test_server().await;
    create_board(&server, &access_token("admin", 10), "free").await;

    let response = server
        .get("/api/v2/boards")
        .add_query_param("page", i64::MAX)
        .add_query_param("page_size", 100)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_list_group_boards() {
    let (server, _db) = create_test_server().await;
    let admin = access_token("admin", 10);
    create_board(&server, &admin, "free").await;
    create_board_with(
        &server,
        &admin,
        json!({ "board_id": "qa", "group_id": "support", "subject": "Q&A" }),
    )
    .await;

    let body: Value = server.get("/api/v2/groups/support/boards").await.json();
    let boards = body["data"].as_array().unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0]["board_id"], "qa");

    let empty: Value = server.get("/api/v2/groups/nobody/boards").await.json();
    assert!(empty["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_board_as_admin() {
    let (server, _db) = create_test_server().await;
    let admin = access_token("admin", 10);
    create_board(&server, &admin, "free").await;

    let response = server
        .put("/api/v2/boards/free")
        .authorization_bearer(&admin)
        .json(&json!({ "subject": "Free Talk", "write_level": 3 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["data"]["message"],
        "Board updated successfully"
    );

    let board: Value = server.get("/api/v2/boards/free").await.json();
    assert_eq!(board["data"]["subject"], "Free Talk");
    assert_eq!(board["data"]["write_level"], 3);
    assert_eq!(board["data"]["read_level"], 1);
}

#[tokio::test]
async fn test_update_board_by_board_admin() {
    let (server, _db) = create_test_server().await;
    let admin = access_token("admin", 10);
    create_board(&server, &admin, "free").await;

    let response = server
        .put("/api/v2/boards/free")
        .authorization_bearer(&admin)
        .json(&json!({ "admin": "moderator" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .put("/api/v2/boards/free")
        .authorization_bearer(access_token("moderator", 3))
        .json(&json!({ "subject": "Moderated" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .put("/api/v2/boards/free")
        .authorization_bearer(access_token("someone", 3))
        .json(&json!({ "subject": "Hijacked" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_board() {
    let (server, db) = create_test_server().await;
    let admin = access_token("admin", 10);
    create_board(&server, &admin, "free").await;
    create_post(&server, &admin, "free", "first").await;

    let response = server
        .delete("/api/v2/boards/free")
        .authorization_bearer(&admin)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["data"]["message"],
        "Board deleted successfully"
    );

    assert!(!db.table_exists("g5_write_free").await.unwrap());
    let response = server.get("/api/v2/boards/free").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // The id is free again.
    create_board(&server, &admin, "free").await;
    let posts: Value = server.get("/api/v2/boards/free/posts").await.json();
    assert!(posts["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_board_requires_admin() {
    let (server, _db) = create_test_server().await;
    create_board(&server, &access_token("admin", 10), "free").await;

    let response = server
        .delete("/api/v2/boards/free")
        .authorization_bearer(access_token("alice", 2))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_missing_board() {
    let (server, _db) = create_test_server().await;

    let response = server
        .delete("/api/v2/boards/ghost")
        .authorization_bearer(access_token("admin", 10))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
