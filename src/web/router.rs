//! Router configuration for the HTTP API.

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_board, create_comment, create_post, delete_board, delete_comment, delete_post,
    get_board, get_comment, get_post, like_post, list_boards, list_comments, list_group_boards,
    list_header_menus, list_menus, list_posts, list_sidebar_menus, login, logout, me, profile,
    refresh, search_posts, unlike_post, update_board, update_comment, update_post, AppState,
};
use super::middleware::create_cors_layer;

/// Create the full application router: `/api/v2` plus `/health`.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/profile", get(profile));

    let board_routes = Router::new()
        .route("/", get(list_boards).post(create_board))
        .route(
            "/:board_id",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route("/:board_id/posts", get(list_posts).post(create_post))
        .route("/:board_id/posts/search", get(search_posts))
        .route(
            "/:board_id/posts/:post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route(
            "/:board_id/posts/:post_id/like",
            post(like_post).delete(unlike_post),
        )
        .route(
            "/:board_id/posts/:post_id/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/:board_id/posts/:post_id/comments/:id",
            get(get_comment).put(update_comment).delete(delete_comment),
        );

    let menu_routes = Router::new()
        .route("/", get(list_menus))
        .route("/sidebar", get(list_sidebar_menus))
        .route("/header", get(list_header_menus));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/boards", board_routes)
        .nest("/menus", menu_routes)
        .route("/groups/:group_id/boards", get(list_group_boards));

    Router::new()
        .nest("/api/v2", api_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
