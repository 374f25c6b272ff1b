use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::party::{
        get::{get_campus_parties, get_party_detail},
        post::create_party,
    },
    models::party::{Party, PartyDetail, PartyStatus},
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyPayload {
    pub title: String,
    pub theme: Option<String>,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct PartyListQuery {
    pub status: Option<PartyStatus>,
}

pub async fn create_party_handler(
    State(state): State<AppState>,
    Path(fraternity_id): Path<Uuid>,
    _claims: AuthClaims,
    Json(payload): Json<CreatePartyPayload>,
) -> Result<Json<Party>, (StatusCode, String)> {
    match create_party(
        fraternity_id,
        payload.title,
        payload.theme,
        payload.venue,
        payload.starts_at,
        payload.ends_at,
        state.postgres.clone(),
    )
    .await
    {
        Ok(party) => Ok(Json(party)),
        Err(err) => {
            tracing::error!("Error creating party: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_campus_parties_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
    Query(query): Query<PartyListQuery>,
) -> Result<Json<Vec<Party>>, (StatusCode, String)> {
    let parties = get_campus_parties(campus_id, query.status, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get parties: {}", e);
            e.to_response()
        })?;

    Ok(Json(parties))
}

pub async fn get_party_handler(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
) -> Result<Json<PartyDetail>, (StatusCode, String)> {
    let detail = get_party_detail(party_id, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get party {}: {}", party_id, e);
            e.to_response()
        })?;

    Ok(Json(detail))
}
