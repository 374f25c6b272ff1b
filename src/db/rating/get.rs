use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::rating::{PartyRating, PartyRatingSample, ReputationRating, ReputationSample},
};

pub async fn get_party_rating_samples(
    party_id: Uuid,
    postgres: PgPool,
) -> Result<Vec<PartyRatingSample>, AppError> {
    sqlx::query_as::<_, PartyRatingSample>(
        "SELECT p.fraternity_id, r.party_id, r.vibe, r.music, r.execution, r.updated_at AS rated_at
        FROM party_ratings r
        JOIN parties p ON p.id = r.party_id
        WHERE r.party_id = $1",
    )
    .bind(party_id)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch party ratings: {}", e)))
}

pub async fn get_campus_party_samples(
    campus_id: Uuid,
    postgres: PgPool,
) -> Result<Vec<PartyRatingSample>, AppError> {
    sqlx::query_as::<_, PartyRatingSample>(
        "SELECT p.fraternity_id, r.party_id, r.vibe, r.music, r.execution, r.updated_at AS rated_at
        FROM party_ratings r
        JOIN parties p ON p.id = r.party_id
        WHERE p.campus_id = $1",
    )
    .bind(campus_id)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch party ratings: {}", e)))
}

pub async fn get_campus_reputation_samples(
    campus_id: Uuid,
    postgres: PgPool,
) -> Result<Vec<ReputationSample>, AppError> {
    sqlx::query_as::<_, ReputationSample>(
        "SELECT r.fraternity_id, r.brotherhood, r.reputation, r.community, r.updated_at AS rated_at
        FROM reputation_ratings r
        JOIN fraternities f ON f.id = r.fraternity_id
        WHERE f.campus_id = $1",
    )
    .bind(campus_id)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch reputation ratings: {}", e)))
}

pub async fn get_user_party_rating(
    party_id: Uuid,
    user_id: Uuid,
    postgres: PgPool,
) -> Result<PartyRating, AppError> {
    sqlx::query_as::<_, PartyRating>(
        "SELECT id, party_id, user_id, vibe, music, execution, created_at, updated_at
        FROM party_ratings
        WHERE party_id = $1 AND user_id = $2",
    )
    .bind(party_id)
    .bind(user_id)
    .fetch_optional(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch party rating: {}", e)))?
    .ok_or_else(|| AppError::NotFound("You have not rated this party".into()))
}

pub async fn get_user_reputation_rating(
    fraternity_id: Uuid,
    user_id: Uuid,
    postgres: PgPool,
) -> Result<ReputationRating, AppError> {
    sqlx::query_as::<_, ReputationRating>(
        "SELECT id, fraternity_id, user_id, brotherhood, reputation, community, created_at, updated_at
        FROM reputation_ratings
        WHERE fraternity_id = $1 AND user_id = $2",
    )
    .bind(fraternity_id)
    .bind(user_id)
    .fetch_optional(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch reputation rating: {}", e)))?
    .ok_or_else(|| AppError::NotFound("You have not rated this fraternity".into()))
}
