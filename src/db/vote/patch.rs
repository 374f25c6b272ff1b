use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::vote::lock::with_vote_lock,
    errors::AppError,
    models::{
        redis::RedisKey,
        vote::{VoteOutcome, VoteTarget, VoteTransition, VoteValue},
    },
    state::RedisClient,
};

/// Writes the caller's vote, then recounts the target from its vote table.
pub async fn apply_vote(
    target: VoteTarget,
    target_id: Uuid,
    user_id: Uuid,
    requested: VoteValue,
    postgres: PgPool,
) -> Result<VoteOutcome, AppError> {
    let target_table = target.target_table();
    let vote_table = target.vote_table();

    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to start transaction: {}", e)))?;

    let exists = sqlx::query_as::<_, (Uuid,)>(&format!(
        "SELECT id FROM {target_table} WHERE id = $1 FOR UPDATE"
    ))
    .bind(target_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to lock {}: {}", target.as_str(), e)))?;

    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "{} {} not found",
            target.as_str(),
            target_id
        )));
    }

    let current = sqlx::query_as::<_, (i16,)>(&format!(
        "SELECT value FROM {vote_table} WHERE target_id = $1 AND user_id = $2"
    ))
    .bind(target_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to read vote: {}", e)))?
    .and_then(|(value,)| VoteValue::from_i16(value));

    let transition = VoteTransition::apply(current, requested);

    match transition.next {
        Some(value) => {
            sqlx::query(&format!(
                "INSERT INTO {vote_table} (target_id, user_id, value)
                VALUES ($1, $2, $3)
                ON CONFLICT (target_id, user_id) DO UPDATE SET value = EXCLUDED.value"
            ))
            .bind(target_id)
            .bind(user_id)
            .bind(value.as_i16())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to save vote: {}", e)))?;
        }
        None => {
            sqlx::query(&format!(
                "DELETE FROM {vote_table} WHERE target_id = $1 AND user_id = $2"
            ))
            .bind(target_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to clear vote: {}", e)))?;
        }
    }

    let (upvotes, downvotes) = sqlx::query_as::<_, (i64, i64)>(&format!(
        "SELECT
            COUNT(*) FILTER (WHERE value = 1),
            COUNT(*) FILTER (WHERE value = -1)
        FROM {vote_table}
        WHERE target_id = $1"
    ))
    .bind(target_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to count votes: {}", e)))?;

    sqlx::query(&format!(
        "UPDATE {target_table} SET upvotes = $2, downvotes = $3 WHERE id = $1"
    ))
    .bind(target_id)
    .bind(upvotes)
    .bind(downvotes)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to update vote counts: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit vote: {}", e)))?;

    tracing::info!(
        "Vote on {} {} by {}: {:?} -> {:?} ({} up, {} down)",
        target.as_str(),
        target_id,
        user_id,
        transition.previous,
        transition.next,
        upvotes,
        downvotes
    );

    Ok(VoteOutcome {
        target_id,
        user_vote: transition.next.map(VoteValue::as_i16).unwrap_or(0),
        upvotes,
        downvotes,
    })
}

pub async fn vote_with_lock(
    target: VoteTarget,
    target_id: Uuid,
    user_id: Uuid,
    requested: VoteValue,
    lock_ttl_ms: u64,
    postgres: PgPool,
    redis: RedisClient,
) -> Result<VoteOutcome, AppError> {
    let key = RedisKey::vote_lock(target, target_id, user_id);
    with_vote_lock(
        &key,
        lock_ttl_ms,
        redis,
        apply_vote(target, target_id, user_id, requested, postgres),
    )
    .await
}
