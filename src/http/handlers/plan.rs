use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::plan::{
        get::{get_plan_tally, get_user_plan_vote},
        put::cast_plan_vote,
    },
    models::plan::{PlanTally, PlanVoteOutcome, parse_night},
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanVotePayload {
    pub party_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPlanVote {
    pub party_id: Option<Uuid>,
}

pub async fn get_plan_handler(
    State(state): State<AppState>,
    Path((campus_id, night)): Path<(Uuid, String)>,
) -> Result<Json<PlanTally>, (StatusCode, String)> {
    let night = parse_night(&night).map_err(|e| e.to_response())?;

    let tally = get_plan_tally(campus_id, night, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get plan tally: {}", e);
            e.to_response()
        })?;

    Ok(Json(tally))
}

pub async fn get_my_plan_vote_handler(
    State(state): State<AppState>,
    Path((campus_id, night)): Path<(Uuid, String)>,
    claims: AuthClaims,
) -> Result<Json<MyPlanVote>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;
    let night = parse_night(&night).map_err(|e| e.to_response())?;

    let party_id = get_user_plan_vote(campus_id, night, user_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    Ok(Json(MyPlanVote { party_id }))
}

pub async fn vote_plan_handler(
    State(state): State<AppState>,
    Path((campus_id, night)): Path<(Uuid, String)>,
    claims: AuthClaims,
    Json(payload): Json<PlanVotePayload>,
) -> Result<Json<PlanVoteOutcome>, (StatusCode, String)> {
    let user_id = claims.user_id().map_err(|e| e.to_response())?;
    let night = parse_night(&night).map_err(|e| e.to_response())?;

    match cast_plan_vote(
        campus_id,
        night,
        user_id,
        payload.party_id,
        state.config.vote_lock_ttl_ms,
        state.postgres.clone(),
        state.redis.clone(),
    )
    .await
    {
        Ok(outcome) => Ok(Json(outcome)),
        Err(err) => {
            tracing::error!("Error casting plan vote: {}", err);
            Err(err.to_response())
        }
    }
}
