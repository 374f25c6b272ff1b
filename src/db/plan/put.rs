use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{party::get::get_party, plan::get::get_plan_tally, vote::lock::with_vote_lock},
    errors::AppError,
    models::{
        plan::{PlanVoteOutcome, is_night_open},
        redis::RedisKey,
    },
    state::RedisClient,
};

async fn toggle_plan_vote(
    campus_id: Uuid,
    night: NaiveDate,
    user_id: Uuid,
    party_id: Uuid,
    postgres: PgPool,
) -> Result<Option<Uuid>, AppError> {
    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to start transaction: {}", e)))?;

    let current = sqlx::query_scalar::<_, Uuid>(
        "SELECT party_id FROM plan_votes
        WHERE campus_id = $1 AND night = $2 AND user_id = $3
        FOR UPDATE",
    )
    .bind(campus_id)
    .bind(night)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to read plan vote: {}", e)))?;

    let next = if current == Some(party_id) {
        sqlx::query("DELETE FROM plan_votes WHERE campus_id = $1 AND night = $2 AND user_id = $3")
            .bind(campus_id)
            .bind(night)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to clear plan vote: {}", e)))?;
        None
    } else {
        sqlx::query(
            "INSERT INTO plan_votes (campus_id, night, user_id, party_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (campus_id, night, user_id) DO UPDATE
            SET party_id = EXCLUDED.party_id, created_at = now()",
        )
        .bind(campus_id)
        .bind(night)
        .bind(user_id)
        .bind(party_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save plan vote: {}", e)))?;
        Some(party_id)
    };

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit plan vote: {}", e)))?;

    Ok(next)
}

pub async fn cast_plan_vote(
    campus_id: Uuid,
    night: NaiveDate,
    user_id: Uuid,
    party_id: Uuid,
    lock_ttl_ms: u64,
    postgres: PgPool,
    redis: RedisClient,
) -> Result<PlanVoteOutcome, AppError> {
    if !is_night_open(night, Utc::now().date_naive()) {
        return Err(AppError::BadRequest(format!(
            "Voting for {} has closed",
            night
        )));
    }

    let party = get_party(party_id, postgres.clone()).await?;
    if party.campus_id != campus_id {
        return Err(AppError::BadRequest(
            "Party belongs to another campus".into(),
        ));
    }

    let key = RedisKey::plan_lock(campus_id, user_id);
    let next = with_vote_lock(
        &key,
        lock_ttl_ms,
        redis,
        toggle_plan_vote(campus_id, night, user_id, party_id, postgres.clone()),
    )
    .await?;

    tracing::info!(
        "Plan vote for campus {} on {} by {}: {:?}",
        campus_id,
        night,
        user_id,
        next
    );

    Ok(PlanVoteOutcome {
        party_id: next,
        tally: get_plan_tally(campus_id, night, postgres).await?,
    })
}
