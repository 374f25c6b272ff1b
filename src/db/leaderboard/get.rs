use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{
        campus::get::get_campus,
        fraternity::get::{get_campus_fraternities, get_fraternity},
        leaderboard::cache::{get_cached_leaderboard, store_leaderboard},
        party::get::get_campus_parties,
        rating::get::{get_campus_party_samples, get_campus_reputation_samples},
    },
    errors::AppError,
    models::{
        fraternity::FraternityDetail,
        leaderboard::{LeaderBoard, PartyLeaderBoard},
        party::PartyStatus,
    },
    scoring::{build_leaderboard, build_party_leaderboard},
    state::RedisClient,
};

pub async fn compute_leaderboard(
    campus_id: Uuid,
    postgres: PgPool,
) -> Result<Vec<LeaderBoard>, AppError> {
    let fraternities = get_campus_fraternities(campus_id, postgres.clone()).await?;
    let reputation = get_campus_reputation_samples(campus_id, postgres.clone()).await?;
    let party_ratings = get_campus_party_samples(campus_id, postgres).await?;

    Ok(build_leaderboard(
        fraternities,
        &reputation,
        &party_ratings,
        Utc::now(),
    ))
}

/// Serves from the Redis cache when present; cache errors fall back to Postgres.
pub async fn get_leaderboard(
    campus_id: Uuid,
    cache_ttl_secs: u64,
    postgres: PgPool,
    redis: RedisClient,
) -> Result<Vec<LeaderBoard>, AppError> {
    match get_cached_leaderboard(campus_id, redis.clone()).await {
        Ok(Some(leaderboard)) => return Ok(leaderboard),
        Ok(None) => {}
        Err(e) => tracing::warn!("Leaderboard cache read failed for {}: {}", campus_id, e),
    }

    get_campus(campus_id, postgres.clone()).await?;
    let leaderboard = compute_leaderboard(campus_id, postgres).await?;

    if let Err(e) = store_leaderboard(campus_id, &leaderboard, cache_ttl_secs, redis).await {
        tracing::warn!("Failed to cache leaderboard for {}: {}", campus_id, e);
    }

    Ok(leaderboard)
}

pub async fn get_party_leaderboard(
    campus_id: Uuid,
    postgres: PgPool,
) -> Result<Vec<PartyLeaderBoard>, AppError> {
    get_campus(campus_id, postgres.clone()).await?;

    let parties = get_campus_parties(campus_id, None, postgres.clone())
        .await?
        .into_iter()
        .filter(|p| p.status_at(Utc::now()) != PartyStatus::Upcoming)
        .collect();
    let party_ratings = get_campus_party_samples(campus_id, postgres).await?;

    Ok(build_party_leaderboard(parties, &party_ratings))
}

pub async fn get_fraternity_detail(
    fraternity_id: Uuid,
    cache_ttl_secs: u64,
    postgres: PgPool,
    redis: RedisClient,
) -> Result<FraternityDetail, AppError> {
    let fraternity = get_fraternity(fraternity_id, postgres.clone()).await?;
    let leaderboard =
        get_leaderboard(fraternity.campus_id, cache_ttl_secs, postgres, redis).await?;

    let entry = leaderboard
        .into_iter()
        .find(|entry| entry.fraternity.id == fraternity_id);

    Ok(match entry {
        Some(entry) => FraternityDetail {
            scores: entry.scores,
            reputation_count: entry.reputation_count,
            party_rating_count: entry.party_rating_count,
            rank: Some(entry.rank),
            fraternity,
        },
        // Created after the cached leaderboard was built
        None => FraternityDetail {
            fraternity,
            scores: Default::default(),
            reputation_count: 0,
            party_rating_count: 0,
            rank: None,
        },
    })
}
