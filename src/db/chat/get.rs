use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::chat::{ChatMessage, ChatSort},
    scoring::rank_hot,
};

/// The hot feed ranks the newest messages of a campus, whatever their age.
const HOT_CANDIDATES: i64 = 500;

const CHAT_COLUMNS: &str =
    "id, campus_id, user_id, body, party_id, fraternity_id, upvotes, downvotes, created_at";

pub async fn get_campus_chat(
    campus_id: Uuid,
    sort: ChatSort,
    limit: i64,
    postgres: PgPool,
) -> Result<Vec<ChatMessage>, AppError> {
    match sort {
        ChatSort::New => sqlx::query_as::<_, ChatMessage>(&format!(
            "SELECT {CHAT_COLUMNS}
            FROM chat_messages
            WHERE campus_id = $1
            ORDER BY created_at DESC
            LIMIT $2"
        ))
        .bind(campus_id)
        .bind(limit)
        .fetch_all(&postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch chat: {}", e))),
        ChatSort::Hot => {
            let candidates = sqlx::query_as::<_, ChatMessage>(&format!(
                "SELECT {CHAT_COLUMNS}
                FROM chat_messages
                WHERE campus_id = $1
                ORDER BY created_at DESC
                LIMIT $2"
            ))
            .bind(campus_id)
            .bind(HOT_CANDIDATES.max(limit))
            .fetch_all(&postgres)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch chat: {}", e)))?;

            Ok(rank_hot(candidates, limit.max(0) as usize, Utc::now()))
        }
    }
}

pub async fn get_chat_message(message_id: Uuid, postgres: PgPool) -> Result<ChatMessage, AppError> {
    sqlx::query_as::<_, ChatMessage>(&format!(
        "SELECT {CHAT_COLUMNS} FROM chat_messages WHERE id = $1"
    ))
    .bind(message_id)
    .fetch_optional(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch chat message: {}", e)))?
    .ok_or_else(|| AppError::NotFound(format!("Chat message {} not found", message_id)))
}
