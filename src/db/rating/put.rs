use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{
        fraternity::get::get_fraternity, leaderboard::cache::invalidate_leaderboard,
        party::get::get_party,
    },
    errors::AppError,
    models::rating::{PartyRating, ReputationRating, validate_score},
    state::RedisClient,
};

/// A second submission by the same user overwrites the first.
pub async fn upsert_party_rating(
    party_id: Uuid,
    user_id: Uuid,
    vibe: f64,
    music: f64,
    execution: f64,
    postgres: PgPool,
    redis: RedisClient,
) -> Result<PartyRating, AppError> {
    let vibe = validate_score("vibe", vibe)?;
    let music = validate_score("music", music)?;
    let execution = validate_score("execution", execution)?;

    let party = get_party(party_id, postgres.clone()).await?;
    if !party.is_rateable_at(Utc::now()) {
        return Err(AppError::BadRequest(
            "Party has not started yet and cannot be rated".into(),
        ));
    }

    let rating = sqlx::query_as::<_, PartyRating>(
        "INSERT INTO party_ratings (party_id, user_id, vibe, music, execution)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (party_id, user_id) DO UPDATE
        SET vibe = EXCLUDED.vibe,
            music = EXCLUDED.music,
            execution = EXCLUDED.execution,
            updated_at = now()
        RETURNING id, party_id, user_id, vibe, music, execution, created_at, updated_at",
    )
    .bind(party_id)
    .bind(user_id)
    .bind(vibe)
    .bind(music)
    .bind(execution)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to save party rating: {}", e)))?;

    invalidate_leaderboard(party.campus_id, redis).await;

    tracing::info!(
        "Saved party rating for party {} by user {}: vibe={}, music={}, execution={}",
        party_id,
        user_id,
        vibe,
        music,
        execution
    );

    Ok(rating)
}

pub async fn upsert_reputation_rating(
    fraternity_id: Uuid,
    user_id: Uuid,
    brotherhood: f64,
    reputation: f64,
    community: f64,
    postgres: PgPool,
    redis: RedisClient,
) -> Result<ReputationRating, AppError> {
    let brotherhood = validate_score("brotherhood", brotherhood)?;
    let reputation = validate_score("reputation", reputation)?;
    let community = validate_score("community", community)?;

    let fraternity = get_fraternity(fraternity_id, postgres.clone()).await?;

    let rating = sqlx::query_as::<_, ReputationRating>(
        "INSERT INTO reputation_ratings (fraternity_id, user_id, brotherhood, reputation, community)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (fraternity_id, user_id) DO UPDATE
        SET brotherhood = EXCLUDED.brotherhood,
            reputation = EXCLUDED.reputation,
            community = EXCLUDED.community,
            updated_at = now()
        RETURNING id, fraternity_id, user_id, brotherhood, reputation, community, created_at, updated_at",
    )
    .bind(fraternity_id)
    .bind(user_id)
    .bind(brotherhood)
    .bind(reputation)
    .bind(community)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to save reputation rating: {}", e)))?;

    invalidate_leaderboard(fraternity.campus_id, redis).await;

    tracing::info!(
        "Saved reputation rating for fraternity {} by user {}",
        fraternity.name,
        user_id
    );

    Ok(rating)
}
