use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Campus {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Slugs are lowercase ascii alphanumerics and dashes, 2 to 64 long.
pub fn is_valid_slug(slug: &str) -> bool {
    let len_ok = (2..=64).contains(&slug.len());
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    len_ok && valid_chars && !slug.starts_with('-') && !slug.ends_with('-')
}
