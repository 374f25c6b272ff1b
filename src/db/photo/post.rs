use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::party::get::get_party,
    errors::AppError,
    models::photo::{PartyPhoto, is_valid_photo_url},
    utils::sanitize_text,
};

const MAX_CAPTION_CHARS: usize = 280;

/// The image itself is already in object storage; only its URL is recorded.
pub async fn create_party_photo(
    party_id: Uuid,
    user_id: Uuid,
    url: String,
    caption: Option<String>,
    postgres: PgPool,
) -> Result<PartyPhoto, AppError> {
    let url = url.trim().to_string();
    if !is_valid_photo_url(&url) {
        return Err(AppError::BadRequest("Photo URL must be http(s)".into()));
    }

    let caption = match caption {
        Some(caption) if !caption.trim().is_empty() => {
            Some(sanitize_text(&caption, MAX_CAPTION_CHARS)?)
        }
        _ => None,
    };

    get_party(party_id, postgres.clone()).await?;

    let photo = sqlx::query_as::<_, PartyPhoto>(
        "INSERT INTO party_photos (party_id, user_id, url, caption)
        VALUES ($1, $2, $3, $4)
        RETURNING id, party_id, user_id, url, caption, upvotes, downvotes, created_at",
    )
    .bind(party_id)
    .bind(user_id)
    .bind(&url)
    .bind(&caption)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to add photo: {}", e)))?;

    tracing::info!("Added photo {} to party {}", photo.id, party_id);

    Ok(photo)
}
