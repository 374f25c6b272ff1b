use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{db::fraternity::get::get_fraternity, errors::AppError, models::party::Party};

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn create_party(
    fraternity_id: Uuid,
    title: String,
    theme: Option<String>,
    venue: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    postgres: PgPool,
) -> Result<Party, AppError> {
    let title = title.trim().to_string();
    if title.is_empty() || title.chars().count() > 160 {
        return Err(AppError::BadRequest(
            "Party title must be 1 to 160 characters".into(),
        ));
    }

    if let Some(ends_at) = ends_at {
        if ends_at <= starts_at {
            return Err(AppError::BadRequest(
                "End time must be after start time".into(),
            ));
        }
    }

    let fraternity = get_fraternity(fraternity_id, postgres.clone()).await?;

    let party = sqlx::query_as::<_, Party>(
        "INSERT INTO parties (fraternity_id, campus_id, title, theme, venue, starts_at, ends_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, fraternity_id, campus_id, title, theme, venue, starts_at, ends_at, created_at",
    )
    .bind(fraternity.id)
    .bind(fraternity.campus_id)
    .bind(&title)
    .bind(clean_optional(theme))
    .bind(clean_optional(venue))
    .bind(starts_at)
    .bind(ends_at)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create party: {}", e)))?;

    tracing::info!(
        "Created party {} (ID: {}) for fraternity {}",
        party.title,
        party.id,
        fraternity.name
    );

    Ok(party)
}
