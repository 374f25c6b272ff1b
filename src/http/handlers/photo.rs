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
        photo::{get::get_party_photos, post::create_party_photo},
        vote::patch::vote_with_lock,
    },
    http::handlers::{VotePayload, comment::SortQuery},
    models::{
        photo::PartyPhoto,
        vote::{VoteOutcome, VoteTarget},
    },
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreatePhotoPayload {
    pub url: String,
    pub caption: Option<String>,
}

pub async fn create_photo_handler(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<CreatePhotoPayload>,
) -> Result<Json<PartyPhoto>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;

    match create_party_photo(
        party_id,
        user_id,
        payload.url,
        payload.caption,
        state.postgres.clone(),
    )
    .await
    {
        Ok(photo) => Ok(Json(photo)),
        Err(err) => {
            tracing::error!("Error adding photo: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_photos_handler(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<PartyPhoto>>, (StatusCode, String)> {
    let photos = get_party_photos(party_id, query.sort, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get photos for {}: {}", party_id, e);
            e.to_response()
        })?;

    Ok(Json(photos))
}

pub async fn vote_photo_handler(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<VotePayload>,
) -> Result<Json<VoteOutcome>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;
    let value = payload.vote_value()?;

    let outcome = vote_with_lock(
        VoteTarget::Photo,
        photo_id,
        user_id,
        value,
        state.config.vote_lock_ttl_ms,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to vote on photo {}: {}", photo_id, e);
        e.to_response()
    })?;

    Ok(Json(outcome))
}
