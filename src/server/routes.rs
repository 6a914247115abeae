//! Request handlers.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::headers::Cookie;
use axum_extra::TypedHeader;
use serde::Deserialize;

use crate::error::{RelayError, RelayResult};
use crate::models::{ChatRequest, ConversationHistory, HistoryItem, UpstreamChatRequest};
use crate::relay::spawn_relay;

use super::auth::require_token;
use super::AppState;

pub const NO_USER_MESSAGE: &str = "No user message found";
pub const CHAT_DELETED: &str = "Chat deleted";
pub const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// `POST /api/chat`: relay one chat turn as a frame stream.
pub async fn chat(
    State(state): State<AppState>,
    cookie: Option<TypedHeader<Cookie>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> RelayResult<Response> {
    let token = require_token(cookie.as_ref(), RelayError::Unauthorized)?;
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected chat body");
        RelayError::BadRequest(NO_USER_MESSAGE.to_string())
    })?;

    let message = request
        .last_user_message()
        .ok_or_else(|| RelayError::BadRequest(NO_USER_MESSAGE.to_string()))?;
    let conversation_id = request.conversation_id();
    tracing::info!(
        conversation_id = conversation_id.unwrap_or("new"),
        messages = request.messages.len(),
        "Chat request"
    );

    let upstream_request = UpstreamChatRequest::new(message.content.clone(), conversation_id);
    let upstream = state
        .upstream
        .send_message(&token, &upstream_request)
        .await
        .map_err(RelayError::from_chat_upstream)?;

    let (body, _task) = spawn_relay(
        upstream,
        state.config.channel_capacity,
        conversation_id.map(String::from),
    );

    Ok((
        [(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)],
        Body::from_stream(body),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// `DELETE /api/chat?id=<id>`
pub async fn delete_chat(
    State(state): State<AppState>,
    cookie: Option<TypedHeader<Cookie>>,
    Query(params): Query<DeleteParams>,
) -> RelayResult<impl IntoResponse> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or(RelayError::NotFound)?;
    let token = require_token(cookie.as_ref(), RelayError::Unauthorized)?;

    state
        .upstream
        .delete_conversation(&token, &id)
        .await
        .map_err(RelayError::from_session_upstream)?;

    tracing::info!(conversation_id = %id, "Conversation deleted");
    Ok((StatusCode::OK, CHAT_DELETED))
}

/// `GET /api/history`: the caller's conversations for the sidebar.
pub async fn history(
    State(state): State<AppState>,
    cookie: Option<TypedHeader<Cookie>>,
) -> RelayResult<Json<Vec<HistoryItem>>> {
    let token = require_token(cookie.as_ref(), RelayError::SessionExpired)?;

    let conversations = state
        .upstream
        .list_conversations(&token)
        .await
        .map_err(RelayError::from_session_upstream)?;

    Ok(Json(conversations.into_iter().map(HistoryItem::from).collect()))
}

/// `GET /api/history/:id`: one conversation with its messages.
pub async fn conversation(
    State(state): State<AppState>,
    cookie: Option<TypedHeader<Cookie>>,
    Path(id): Path<String>,
) -> RelayResult<Json<ConversationHistory>> {
    let token = require_token(cookie.as_ref(), RelayError::SessionExpired)?;

    let messages = state
        .upstream
        .conversation_history(&token, &id)
        .await
        .map_err(RelayError::from_session_upstream)?;

    Ok(Json(ConversationHistory::from_messages(
        &id,
        messages,
        chrono::Utc::now(),
    )))
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
