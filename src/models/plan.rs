use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanOption {
    pub party_id: Uuid,
    pub title: String,
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTally {
    pub campus_id: Uuid,
    pub night: NaiveDate,
    pub total_votes: i64,
    pub options: Vec<PlanOption>,
}

impl PlanTally {
    pub fn new(campus_id: Uuid, night: NaiveDate, mut options: Vec<PlanOption>) -> Self {
        options.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.title.cmp(&b.title)));
        let total_votes = options.iter().map(|o| o.votes).sum();

        Self {
            campus_id,
            night,
            total_votes,
            options,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanVoteOutcome {
    /// The party the caller now votes for, `None` after toggling off.
    pub party_id: Option<Uuid>,
    pub tally: PlanTally,
}

pub fn parse_night(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        AppError::BadRequest(format!(
            "Invalid night '{}': {}. Expected format: YYYY-MM-DD",
            raw, e
        ))
    })
}

/// Voting stays open through the morning after, then closes.
pub fn is_night_open(night: NaiveDate, today: NaiveDate) -> bool {
    night >= today - Duration::days(1)
}
