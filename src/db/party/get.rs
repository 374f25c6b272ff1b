use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{photo::get::get_party_photos, rating::get::get_party_rating_samples},
    errors::AppError,
    models::{
        comment::ListSort,
        party::{Party, PartyDetail, PartyStatus},
    },
    scoring::{select_cover, summarize_party},
};

const PARTY_COLUMNS: &str =
    "id, fraternity_id, campus_id, title, theme, venue, starts_at, ends_at, created_at";

pub async fn get_party(party_id: Uuid, postgres: PgPool) -> Result<Party, AppError> {
    sqlx::query_as::<_, Party>(&format!("SELECT {PARTY_COLUMNS} FROM parties WHERE id = $1"))
        .bind(party_id)
        .fetch_optional(&postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch party: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Party {} not found", party_id)))
}

/// Status is derived from the clock, so filtering happens after the fetch.
pub async fn get_campus_parties(
    campus_id: Uuid,
    status: Option<PartyStatus>,
    postgres: PgPool,
) -> Result<Vec<Party>, AppError> {
    let parties = sqlx::query_as::<_, Party>(&format!(
        "SELECT {PARTY_COLUMNS}
        FROM parties
        WHERE campus_id = $1
        ORDER BY starts_at DESC"
    ))
    .bind(campus_id)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch parties: {}", e)))?;

    let now = Utc::now();
    Ok(match status {
        Some(status) => parties
            .into_iter()
            .filter(|p| p.status_at(now) == status)
            .collect(),
        None => parties,
    })
}

pub async fn get_fraternity_parties(
    fraternity_id: Uuid,
    postgres: PgPool,
) -> Result<Vec<Party>, AppError> {
    sqlx::query_as::<_, Party>(&format!(
        "SELECT {PARTY_COLUMNS}
        FROM parties
        WHERE fraternity_id = $1
        ORDER BY starts_at DESC"
    ))
    .bind(fraternity_id)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch parties: {}", e)))
}

pub async fn get_party_detail(party_id: Uuid, postgres: PgPool) -> Result<PartyDetail, AppError> {
    let party = get_party(party_id, postgres.clone()).await?;
    let samples = get_party_rating_samples(party_id, postgres.clone()).await?;
    let photos = get_party_photos(party_id, ListSort::New, postgres).await?;

    let sample_refs: Vec<_> = samples.iter().collect();

    Ok(PartyDetail {
        status: party.status_at(Utc::now()),
        ratings: summarize_party(&sample_refs),
        cover_photo: select_cover(&photos).cloned(),
        party,
    })
}
