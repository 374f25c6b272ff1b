use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::plan::{PlanOption, PlanTally},
};

pub async fn get_plan_tally(
    campus_id: Uuid,
    night: NaiveDate,
    postgres: PgPool,
) -> Result<PlanTally, AppError> {
    let options = sqlx::query_as::<_, PlanOption>(
        "SELECT p.id AS party_id, p.title, COUNT(v.user_id) AS votes
        FROM plan_votes v
        JOIN parties p ON p.id = v.party_id
        WHERE v.campus_id = $1 AND v.night = $2
        GROUP BY p.id, p.title",
    )
    .bind(campus_id)
    .bind(night)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch plan votes: {}", e)))?;

    Ok(PlanTally::new(campus_id, night, options))
}

pub async fn get_user_plan_vote(
    campus_id: Uuid,
    night: NaiveDate,
    user_id: Uuid,
    postgres: PgPool,
) -> Result<Option<Uuid>, AppError> {
    let vote = sqlx::query_scalar::<_, Uuid>(
        "SELECT party_id FROM plan_votes WHERE campus_id = $1 AND night = $2 AND user_id = $3",
    )
    .bind(campus_id)
    .bind(night)
    .bind(user_id)
    .fetch_optional(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch plan vote: {}", e)))?;

    Ok(vote)
}
