use sqlx::PgPool;
use uuid::Uuid;

use crate::{errors::AppError, models::fraternity::Fraternity};

pub async fn get_campus_fraternities(
    campus_id: Uuid,
    postgres: PgPool,
) -> Result<Vec<Fraternity>, AppError> {
    sqlx::query_as::<_, Fraternity>(
        "SELECT id, campus_id, name, chapter, description, created_at
        FROM fraternities
        WHERE campus_id = $1
        ORDER BY name ASC",
    )
    .bind(campus_id)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch fraternities: {}", e)))
}

pub async fn get_fraternity(fraternity_id: Uuid, postgres: PgPool) -> Result<Fraternity, AppError> {
    sqlx::query_as::<_, Fraternity>(
        "SELECT id, campus_id, name, chapter, description, created_at
        FROM fraternities
        WHERE id = $1",
    )
    .bind(fraternity_id)
    .fetch_optional(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch fraternity: {}", e)))?
    .ok_or_else(|| AppError::NotFound(format!("Fraternity {} not found", fraternity_id)))
}
