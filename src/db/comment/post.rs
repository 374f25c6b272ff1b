use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::party::get::get_party,
    errors::AppError,
    models::comment::{MAX_COMMENT_CHARS, PartyComment},
    utils::sanitize_text,
};

pub async fn create_party_comment(
    party_id: Uuid,
    user_id: Uuid,
    body: String,
    postgres: PgPool,
) -> Result<PartyComment, AppError> {
    let body = sanitize_text(&body, MAX_COMMENT_CHARS)?;
    get_party(party_id, postgres.clone()).await?;

    let comment = sqlx::query_as::<_, PartyComment>(
        "INSERT INTO party_comments (party_id, user_id, body)
        VALUES ($1, $2, $3)
        RETURNING id, party_id, user_id, body, upvotes, downvotes, created_at",
    )
    .bind(party_id)
    .bind(user_id)
    .bind(&body)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create comment: {}", e)))?;

    tracing::info!("Created comment {} on party {}", comment.id, party_id);

    Ok(comment)
}
