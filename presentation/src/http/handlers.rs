//! HTTP request handlers.
//!
//! `send_message` is the streaming endpoint: validation and user-message
//! persistence happen before the response switches to an event stream (so
//! bad requests still get proper statuses), then the exchange is driven by
//! a spawned task feeding the SSE body through an [`SseRelay`].

use crate::http::error::ApiError;
use crate::http::sse::SseRelay;
use crate::http::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use futures::Stream;
use hearth_application::use_cases::manage_user::{CreateUserInput, UpdateSettingsInput};
use hearth_application::use_cases::send_message::SendMessageInput;
use hearth_domain::{Chat, ChatId, ParseChatIdError, User};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Defaults to empty so a missing field is rejected as an empty
    /// prompt (400) rather than as a deserialization failure.
    #[serde(default)]
    pub message: String,
    #[serde(rename = "chatId", default)]
    pub chat_id: Option<String>,
}

/// Relay a prompt to the engine and stream the answer as server-sent
/// events.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let chat_id = request
        .chat_id
        .as_deref()
        .map(str::parse::<ChatId>)
        .transpose()
        .map_err(|e: ParseChatIdError| ApiError::bad_request(e.to_string()))?;

    let pending = state
        .send_message
        .begin(SendMessageInput {
            message: request.message,
            chat_id,
        })
        .await?;

    let (relay, rx) = SseRelay::channel();
    let use_case = Arc::clone(&state.send_message);
    tokio::spawn(async move {
        use_case.stream(pending, Arc::new(relay)).await;
    });

    let stream = UnboundedReceiverStream::new(rx).map(|frame| Ok(frame.into_event()));
    Ok(Sse::new(stream))
}

/// `GET /api/chats`
pub async fn list_chats(State(state): State<AppState>) -> Result<Json<Vec<Chat>>, ApiError> {
    Ok(Json(state.chats.list().await?))
}

/// `DELETE /api/chat/{id}`
pub async fn delete_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ChatId = id
        .parse()
        .map_err(|e: ParseChatIdError| ApiError::bad_request(e.to_string()))?;
    state.chats.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/chats`
pub async fn delete_all_chats(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.chats.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

/// `GET /api/user`
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(
        state.users.get_settings(query.username.as_deref()).await?,
    ))
}

/// Body of `POST /api/create-user`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub about_me: String,
}

/// `POST /api/create-user`
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state
        .users
        .create(CreateUserInput {
            username: request.username,
            about_me: request.about_me,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Body of `PUT /api/user`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub about_me: String,
    #[serde(default)]
    pub preferences: String,
}

/// `PUT /api/user`
pub async fn update_user(
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .update_settings(UpdateSettingsInput {
            username: request.username,
            about_me: request.about_me,
            preferences: request.preferences,
        })
        .await?;
    Ok(Json(user))
}
