use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::{
    db::leaderboard::get::{get_leaderboard, get_party_leaderboard},
    models::leaderboard::{LeaderBoard, PartyLeaderBoard},
    state::AppState,
};

pub async fn get_leaderboard_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
) -> Result<Json<Vec<LeaderBoard>>, (StatusCode, String)> {
    let leaderboard = get_leaderboard(
        campus_id,
        state.config.leaderboard_cache_ttl_secs,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to get leaderboard: {}", e);
        e.to_response()
    })?;

    Ok(Json(leaderboard))
}

pub async fn get_party_leaderboard_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
) -> Result<Json<Vec<PartyLeaderBoard>>, (StatusCode, String)> {
    let leaderboard = get_party_leaderboard(campus_id, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get party leaderboard: {}", e);
            e.to_response()
        })?;

    Ok(Json(leaderboard))
}
