use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::{
        chat::{
            get::{get_campus_chat, get_chat_message},
            post::create_chat_message,
        },
        vote::patch::vote_with_lock,
    },
    errors::AppError,
    http::handlers::VotePayload,
    models::{
        chat::{CHAT_HISTORY_LEN, ChatMessage, ChatServerMessage, ChatSort},
        vote::{VoteOutcome, VoteTarget},
    },
    state::AppState,
};

const MAX_CHAT_PAGE: i64 = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatPayload {
    pub body: String,
    pub party_id: Option<Uuid>,
    pub fraternity_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct ChatListQuery {
    #[serde(default)]
    pub sort: ChatSort,
    pub limit: Option<i64>,
}

pub async fn post_chat_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<CreateChatPayload>,
) -> Result<Json<ChatMessage>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;

    let message = create_chat_message(
        campus_id,
        user_id,
        payload.body,
        payload.party_id,
        payload.fraternity_id,
        state.postgres.clone(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Error posting chat message: {}", e);
        e.to_response()
    })?;

    let delivered = state
        .chat_feeds
        .publish(
            campus_id,
            ChatServerMessage::Chat {
                message: message.clone(),
            },
        )
        .await;
    tracing::debug!("Chat message {} pushed to {} listeners", message.id, delivered);

    Ok(Json(message))
}

pub async fn get_chat_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
    Query(query): Query<ChatListQuery>,
) -> Result<Json<Vec<ChatMessage>>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(CHAT_HISTORY_LEN);
    if !(1..=MAX_CHAT_PAGE).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_CHAT_PAGE
        ))
        .to_response());
    }

    let messages = get_campus_chat(campus_id, query.sort, limit, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get chat for {}: {}", campus_id, e);
            e.to_response()
        })?;

    Ok(Json(messages))
}

pub async fn vote_chat_handler(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<VotePayload>,
) -> Result<Json<VoteOutcome>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;
    let value = payload.vote_value()?;

    let message = get_chat_message(message_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    let outcome = vote_with_lock(
        VoteTarget::Chat,
        message_id,
        user_id,
        value,
        state.config.vote_lock_ttl_ms,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to vote on chat message {}: {}", message_id, e);
        e.to_response()
    })?;

    state
        .chat_feeds
        .publish(
            message.campus_id,
            ChatServerMessage::VoteUpdate {
                message_id,
                upvotes: outcome.upvotes,
                downvotes: outcome.downvotes,
            },
        )
        .await;

    Ok(Json(outcome))
}
