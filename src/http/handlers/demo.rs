use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{
    state::AppState,
    store::{EntityStore, ListQuery},
};

pub async fn list_entities_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Vec<Value>>, (StatusCode, String)> {
    let store = EntityStore::new(state.store.as_ref(), &entity).map_err(|e| e.to_response())?;
    let query = ListQuery::from_params(params).map_err(|e| e.to_response())?;

    let records = store.list(&query).await.map_err(|e| {
        tracing::error!("Failed to list demo {}: {}", entity, e);
        e.to_response()
    })?;

    Ok(Json(records))
}

pub async fn create_entity_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(record): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let store = EntityStore::new(state.store.as_ref(), &entity).map_err(|e| e.to_response())?;

    let created = store.create(record).await.map_err(|e| {
        tracing::error!("Failed to create demo {}: {}", entity, e);
        e.to_response()
    })?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_entity_handler(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let store = EntityStore::new(state.store.as_ref(), &entity).map_err(|e| e.to_response())?;
    let record = store.get(&id).await.map_err(|e| e.to_response())?;

    Ok(Json(record))
}

pub async fn update_entity_handler(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let store = EntityStore::new(state.store.as_ref(), &entity).map_err(|e| e.to_response())?;

    let updated = store.update(&id, patch).await.map_err(|e| {
        tracing::error!("Failed to update demo {} {}: {}", entity, id, e);
        e.to_response()
    })?;

    Ok(Json(updated))
}

pub async fn delete_entity_handler(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let store = EntityStore::new(state.store.as_ref(), &entity).map_err(|e| e.to_response())?;
    store.delete(&id).await.map_err(|e| e.to_response())?;

    Ok(StatusCode::NO_CONTENT)
}
