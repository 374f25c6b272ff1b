use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{errors::AppError, scoring::clamp_score};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PartyRating {
    pub id: Uuid,
    pub party_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub vibe: f64,
    pub music: f64,
    pub execution: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReputationRating {
    pub id: Uuid,
    pub fraternity_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub brotherhood: f64,
    pub reputation: f64,
    pub community: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A party rating as fed into score aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct PartyRatingSample {
    pub fraternity_id: Uuid,
    pub party_id: Uuid,
    pub vibe: f64,
    pub music: f64,
    pub execution: f64,
    pub rated_at: DateTime<Utc>,
}

/// A reputation rating as fed into score aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct ReputationSample {
    pub fraternity_id: Uuid,
    pub brotherhood: f64,
    pub reputation: f64,
    pub community: f64,
    pub rated_at: DateTime<Utc>,
}

/// Rejects NaN and infinities, then clamps into the score range.
pub fn validate_score(field: &str, value: f64) -> Result<f64, AppError> {
    if !value.is_finite() {
        return Err(AppError::BadRequest(format!(
            "{field} must be a finite number"
        )));
    }

    Ok(clamp_score(value))
}
