use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::campus::{
        get::{get_all_campuses, get_campus},
        post::create_campus,
    },
    models::campus::Campus,
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateCampusPayload {
    pub name: String,
    pub slug: String,
}

pub async fn create_campus_handler(
    State(state): State<AppState>,
    _claims: AuthClaims,
    Json(payload): Json<CreateCampusPayload>,
) -> Result<Json<Campus>, (StatusCode, String)> {
    match create_campus(payload.name, payload.slug, state.postgres.clone()).await {
        Ok(campus) => Ok(Json(campus)),
        Err(err) => {
            tracing::error!("Error creating campus: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_campuses_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Campus>>, (StatusCode, String)> {
    let campuses = get_all_campuses(state.postgres.clone()).await.map_err(|e| {
        tracing::error!("Failed to get campuses: {}", e);
        e.to_response()
    })?;

    Ok(Json(campuses))
}

pub async fn get_campus_handler(
    State(state): State<AppState>,
    Path(campus_id): Path<Uuid>,
) -> Result<Json<Campus>, (StatusCode, String)> {
    let campus = get_campus(campus_id, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to get campus {}: {}", campus_id, e);
            e.to_response()
        })?;

    Ok(Json(campus))
}
