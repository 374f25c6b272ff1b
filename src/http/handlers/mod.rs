pub mod campus;
pub mod chat;
pub mod comment;
pub mod demo;
pub mod fraternity;
pub mod leaderboard;
pub mod party;
pub mod photo;
pub mod plan;
pub mod rating;

use axum::http::StatusCode;
use serde::Deserialize;

use crate::{errors::AppError, models::vote::VoteValue};

#[derive(Deserialize)]
pub struct VotePayload {
    pub value: i16,
}

impl VotePayload {
    pub fn vote_value(&self) -> Result<VoteValue, (StatusCode, String)> {
        VoteValue::from_i16(self.value).ok_or_else(|| {
            AppError::BadRequest("Vote value must be 1 or -1".into()).to_response()
        })
    }
}

pub async fn health_handler() -> &'static str {
    "ok"
}
