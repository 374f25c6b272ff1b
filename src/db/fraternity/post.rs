use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{campus::get::get_campus, leaderboard::cache::invalidate_leaderboard},
    errors::AppError,
    models::fraternity::Fraternity,
    state::RedisClient,
};

pub async fn create_fraternity(
    campus_id: Uuid,
    name: String,
    chapter: Option<String>,
    description: Option<String>,
    postgres: PgPool,
    redis: RedisClient,
) -> Result<Fraternity, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() || name.chars().count() > 120 {
        return Err(AppError::BadRequest(
            "Fraternity name must be 1 to 120 characters".into(),
        ));
    }

    // 404 for unknown campuses rather than a foreign key error
    get_campus(campus_id, postgres.clone()).await?;

    let existing = sqlx::query_as::<_, (Uuid,)>(
        "SELECT id FROM fraternities WHERE campus_id = $1 AND lower(name) = lower($2)",
    )
    .bind(campus_id)
    .bind(&name)
    .fetch_optional(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to query fraternity: {}", e)))?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Fraternity '{}' already exists on this campus",
            name
        )));
    }

    let fraternity = sqlx::query_as::<_, Fraternity>(
        "INSERT INTO fraternities (campus_id, name, chapter, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, campus_id, name, chapter, description, created_at",
    )
    .bind(campus_id)
    .bind(&name)
    .bind(chapter.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()))
    .bind(description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()))
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create fraternity: {}", e)))?;

    // New entries must show up unscored right away
    invalidate_leaderboard(campus_id, redis).await;

    tracing::info!(
        "Created fraternity {} (ID: {}) on campus {}",
        fraternity.name,
        fraternity.id,
        campus_id
    );

    Ok(fraternity)
}
