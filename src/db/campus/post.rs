use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::campus::{Campus, is_valid_slug},
};

pub async fn create_campus(name: String, slug: String, postgres: PgPool) -> Result<Campus, AppError> {
    let name = name.trim().to_string();
    let slug = slug.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::BadRequest("Campus name cannot be empty".into()));
    }
    if !is_valid_slug(&slug) {
        return Err(AppError::BadRequest(format!("Invalid campus slug '{}'", slug)));
    }

    let existing = sqlx::query_as::<_, (uuid::Uuid,)>("SELECT id FROM campuses WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(&postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to query campus: {}", e)))?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Campus with slug '{}' already exists",
            slug
        )));
    }

    let campus = sqlx::query_as::<_, Campus>(
        "INSERT INTO campuses (name, slug)
        VALUES ($1, $2)
        RETURNING id, name, slug, created_at",
    )
    .bind(&name)
    .bind(&slug)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create campus: {}", e)))?;

    tracing::info!("Created campus {} (ID: {})", campus.slug, campus.id);

    Ok(campus)
}
