use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PartyPhoto {
    pub id: Uuid,
    pub party_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: DateTime<Utc>,
}

impl PartyPhoto {
    pub fn net_score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

pub fn is_valid_photo_url(url: &str) -> bool {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    match rest {
        Some(rest) => {
            !rest.is_empty()
                && url.len() <= 2048
                && !rest.chars().any(|c| c.is_whitespace() || c.is_control())
        }
        None => false,
    }
}
