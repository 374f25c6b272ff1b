use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{campus::get::get_campus, fraternity::get::get_fraternity, party::get::get_party},
    errors::AppError,
    models::chat::{ChatMessage, MAX_CHAT_CHARS},
    utils::sanitize_text,
};

pub async fn create_chat_message(
    campus_id: Uuid,
    user_id: Uuid,
    body: String,
    party_id: Option<Uuid>,
    fraternity_id: Option<Uuid>,
    postgres: PgPool,
) -> Result<ChatMessage, AppError> {
    let body = sanitize_text(&body, MAX_CHAT_CHARS)?;
    get_campus(campus_id, postgres.clone()).await?;

    // Mentions must point inside the same campus
    if let Some(party_id) = party_id {
        let party = get_party(party_id, postgres.clone()).await?;
        if party.campus_id != campus_id {
            return Err(AppError::BadRequest(
                "Mentioned party belongs to another campus".into(),
            ));
        }
    }
    if let Some(fraternity_id) = fraternity_id {
        let fraternity = get_fraternity(fraternity_id, postgres.clone()).await?;
        if fraternity.campus_id != campus_id {
            return Err(AppError::BadRequest(
                "Mentioned fraternity belongs to another campus".into(),
            ));
        }
    }

    let message = sqlx::query_as::<_, ChatMessage>(
        "INSERT INTO chat_messages (campus_id, user_id, body, party_id, fraternity_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, campus_id, user_id, body, party_id, fraternity_id, upvotes, downvotes, created_at",
    )
    .bind(campus_id)
    .bind(user_id)
    .bind(&body)
    .bind(party_id)
    .bind(fraternity_id)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to post chat message: {}", e)))?;

    tracing::debug!("Stored chat message {} for campus {}", message.id, campus_id);

    Ok(message)
}
