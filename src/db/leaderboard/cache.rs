use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{leaderboard::LeaderBoard, redis::RedisKey},
    state::RedisClient,
};

pub async fn get_cached_leaderboard(
    campus_id: Uuid,
    redis: RedisClient,
) -> Result<Option<Vec<LeaderBoard>>, AppError> {
    let mut conn = redis.get().await?;

    let key = RedisKey::leaderboard(campus_id);
    let cached: Option<String> = redis::cmd("GET")
        .arg(&key)
        .query_async(&mut *conn)
        .await
        .map_err(AppError::RedisCommandError)?;

    let Some(cached) = cached else {
        return Ok(None);
    };

    match serde_json::from_str::<Vec<LeaderBoard>>(&cached) {
        Ok(leaderboard) => Ok(Some(leaderboard)),
        Err(e) => {
            tracing::warn!("Discarding unreadable leaderboard cache {}: {}", key, e);
            Ok(None)
        }
    }
}

pub async fn store_leaderboard(
    campus_id: Uuid,
    leaderboard: &[LeaderBoard],
    ttl_secs: u64,
    redis: RedisClient,
) -> Result<(), AppError> {
    let mut conn = redis.get().await?;

    let serialized =
        serde_json::to_string(leaderboard).map_err(|e| AppError::Serialization(e.to_string()))?;

    let _: () = redis::cmd("SET")
        .arg(RedisKey::leaderboard(campus_id))
        .arg(serialized)
        .arg("EX")
        .arg(ttl_secs.max(1))
        .query_async(&mut *conn)
        .await
        .map_err(AppError::RedisCommandError)?;

    Ok(())
}

/// Failures only delay freshness until the TTL runs out, so they are logged.
pub async fn invalidate_leaderboard(campus_id: Uuid, redis: RedisClient) {
    let result: Result<(), AppError> = async {
        let mut conn = redis.get().await?;
        let _: u32 = redis::cmd("DEL")
            .arg(RedisKey::leaderboard(campus_id))
            .query_async(&mut *conn)
            .await?;
        Ok(())
    }
    .await;

    if let Err(e) = result {
        tracing::warn!(
            "Failed to invalidate leaderboard cache for campus {}: {}",
            campus_id,
            e
        );
    }
}
