use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::leaderboard::ScoreBreakdown;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Fraternity {
    pub id: Uuid,
    pub campus_id: Uuid,
    pub name: String,
    pub chapter: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraternityDetail {
    pub fraternity: Fraternity,
    pub scores: ScoreBreakdown,
    pub reputation_count: u64,
    pub party_rating_count: u64,
    pub rank: Option<u64>,
}
