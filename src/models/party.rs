use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::photo::PartyPhoto;

/// Assumed length of a party that was created without an end time.
pub const DEFAULT_PARTY_HOURS: i64 = 6;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: Uuid,
    pub fraternity_id: Uuid,
    pub campus_id: Uuid,
    pub title: String,
    pub theme: Option<String>,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    Upcoming,
    Live,
    Completed,
}

impl Party {
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.ends_at
            .unwrap_or_else(|| self.starts_at + Duration::hours(DEFAULT_PARTY_HOURS))
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> PartyStatus {
        if now < self.starts_at {
            PartyStatus::Upcoming
        } else if now < self.effective_end() {
            PartyStatus::Live
        } else {
            PartyStatus::Completed
        }
    }

    /// Parties are rated post-hoc, which includes while they are live.
    pub fn is_rateable_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) != PartyStatus::Upcoming
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub rating_count: u64,
    pub vibe: Option<f64>,
    pub music: Option<f64>,
    pub execution: Option<f64>,
    pub overall: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDetail {
    pub party: Party,
    pub status: PartyStatus,
    pub ratings: RatingSummary,
    pub cover_photo: Option<PartyPhoto>,
}
