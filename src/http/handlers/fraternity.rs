use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::{
        fraternity::{get::get_campus_fraternities, post::create_fraternity},
        leaderboard::get::get_fraternity_detail,
        party::get::get_fraternity_parties,
    },
    models::{
        fraternity::{Fraternity, FraternityDetail},
        party::Party,
    },
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateFraternityPayload {
    pub name: String,
    pub chapter: Option<String>,
    pub description: Option<String>,
}

pub async fn create_fraternity_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
    _claims: AuthClaims,
    Json(payload): Json<CreateFraternityPayload>,
) -> Result<Json<Fraternity>, (StatusCode, String)> {
    match create_fraternity(
        campus_id,
        payload.name,
        payload.chapter,
        payload.description,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    {
        Ok(fraternity) => Ok(Json(fraternity)),
        Err(err) => {
            tracing::error!("Error creating fraternity: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_campus_fraternities_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
) -> Result<Json<Vec<Fraternity>>, (StatusCode, String)> {
    let fraternities = get_campus_fraternities(campus_id, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get fraternities: {}", e);
            e.to_response()
        })?;

    Ok(Json(fraternities))
}

pub async fn get_fraternity_handler(
    State(state): State<AppState>,
    Path(fraternity_id): Path<Uuid>,
) -> Result<Json<FraternityDetail>, (StatusCode, String)> {
    let detail = get_fraternity_detail(
        fraternity_id,
        state.config.leaderboard_cache_ttl_secs,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to get fraternity {}: {}", fraternity_id, e);
        e.to_response()
    })?;

    Ok(Json(detail))
}

pub async fn get_fraternity_parties_handler(
    State(state): State<AppState>,
    Path(fraternity_id): Path<Uuid>,
) -> Result<Json<Vec<Party>>, (StatusCode, String)> {
    let parties = get_fraternity_parties(fraternity_id, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get parties of {}: {}", fraternity_id, e);
            e.to_response()
        })?;

    Ok(Json(parties))
}
