//! Route table.

use crate::http::handlers;
use crate::http::state::AppState;
use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::send_message))
        .route(
            "/api/chats",
            get(handlers::list_chats).delete(handlers::delete_all_chats),
        )
        .route("/api/chat/{id}", delete(handlers::delete_chat))
        .route(
            "/api/user",
            get(handlers::get_user).put(handlers::update_user),
        )
        .route("/api/create-user", post(handlers::create_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
