use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::comment::{ListSort, PartyComment},
};

pub async fn get_party_comments(
    party_id: Uuid,
    sort: ListSort,
    postgres: PgPool,
) -> Result<Vec<PartyComment>, AppError> {
    let order = match sort {
        ListSort::Top => "(upvotes - downvotes) DESC, created_at DESC",
        ListSort::New => "created_at DESC",
    };

    sqlx::query_as::<_, PartyComment>(&format!(
        "SELECT id, party_id, user_id, body, upvotes, downvotes, created_at
        FROM party_comments
        WHERE party_id = $1
        ORDER BY {order}"
    ))
    .bind(party_id)
    .fetch_all(&postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch comments: {}", e)))
}
