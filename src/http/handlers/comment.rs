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
        comment::{get::get_party_comments, post::create_party_comment},
        vote::patch::vote_with_lock,
    },
    http::handlers::VotePayload,
    models::{
        comment::{ListSort, PartyComment},
        vote::{VoteOutcome, VoteTarget},
    },
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateCommentPayload {
    pub body: String,
}

#[derive(Deserialize)]
pub struct SortQuery {
    #[serde(default)]
    pub sort: ListSort,
}

pub async fn create_comment_handler(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<Json<PartyComment>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;

    match create_party_comment(party_id, user_id, payload.body, state.postgres.clone()).await {
        Ok(comment) => Ok(Json(comment)),
        Err(err) => {
            tracing::error!("Error creating comment: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_comments_handler(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<PartyComment>>, (StatusCode, String)> {
    let comments = get_party_comments(party_id, query.sort, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get comments for {}: {}", party_id, e);
            e.to_response()
        })?;

    Ok(Json(comments))
}

pub async fn vote_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<VotePayload>,
) -> Result<Json<VoteOutcome>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;
    let value = payload.vote_value()?;

    let outcome = vote_with_lock(
        VoteTarget::Comment,
        comment_id,
        user_id,
        value,
        state.config.vote_lock_ttl_ms,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to vote on comment {}: {}", comment_id, e);
        e.to_response()
    })?;

    Ok(Json(outcome))
}
