use sqlx::PgPool;
use uuid::Uuid;

use crate::{errors::AppError, models::campus::Campus};

pub async fn get_all_campuses(postgres: PgPool) -> Result<Vec<Campus>, AppError> {
    sqlx::query_as::<_, Campus>(
        "SELECT id, name, slug, created_at
        FROM campuses
        ORDER BY name ASC",
    )
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch campuses: {}", e)))
}

pub async fn get_campus(campus_id: Uuid, postgres: PgPool) -> Result<Campus, AppError> {
    sqlx::query_as::<_, Campus>(
        "SELECT id, name, slug, created_at
        FROM campuses
        WHERE id = $1",
    )
    .bind(campus_id)
    .fetch_optional(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch campus: {}", e)))?
    .ok_or_else(|| AppError::NotFound(format!("Campus {} not found", campus_id)))
}
