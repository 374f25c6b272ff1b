use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::rating::{
        get::{get_user_party_rating, get_user_reputation_rating},
        put::{upsert_party_rating, upsert_reputation_rating},
    },
    models::rating::{PartyRating, ReputationRating},
    state::AppState,
};

#[derive(Deserialize)]
pub struct PartyRatingPayload {
    pub vibe: f64,
    pub music: f64,
    pub execution: f64,
}

#[derive(Deserialize)]
pub struct ReputationRatingPayload {
    pub brotherhood: f64,
    pub reputation: f64,
    pub community: f64,
}

pub async fn rate_party_handler(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<PartyRatingPayload>,
) -> Result<Json<PartyRating>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;

    match upsert_party_rating(
        party_id,
        user_id,
        payload.vibe,
        payload.music,
        payload.execution,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    {
        Ok(rating) => Ok(Json(rating)),
        Err(err) => {
            tracing::error!("Error rating party {}: {}", party_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn get_my_party_rating_handler(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    claims: AuthClaims,
) -> Result<Json<PartyRating>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;

    let rating = get_user_party_rating(party_id, user_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    Ok(Json(rating))
}

pub async fn rate_fraternity_handler(
    State(state): State<AppState>,
    Path(fraternity_id): Path<Uuid>,
    claims: AuthClaims,
    Json(payload): Json<ReputationRatingPayload>,
) -> Result<Json<ReputationRating>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;

    match upsert_reputation_rating(
        fraternity_id,
        user_id,
        payload.brotherhood,
        payload.reputation,
        payload.community,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    {
        Ok(rating) => Ok(Json(rating)),
        Err(err) => {
            tracing::error!("Error rating fraternity {}: {}", fraternity_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn get_my_reputation_rating_handler(
    State(state): State<AppState>,
    Path(fraternity_id): Path<Uuid>,
    claims: AuthClaims,
) -> Result<Json<ReputationRating>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;

    let rating = get_user_reputation_rating(fraternity_id, user_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    Ok(Json(rating))
}
