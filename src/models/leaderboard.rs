use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{fraternity::Fraternity, party::Party};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub reputation: Option<f64>,
    pub party: Option<f64>,
    pub trending: Option<f64>,
    pub overall: Option<f64>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderBoard {
    pub fraternity: Fraternity,
    pub scores: ScoreBreakdown,
    pub reputation_count: u64,
    pub party_rating_count: u64,
    pub rank: u64,
}

impl LeaderBoard {
    pub fn total_ratings(&self) -> u64 {
        self.reputation_count + self.party_rating_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyLeaderBoard {
    pub party: Party,
    pub fraternity_id: Uuid,
    pub score: f64,
    pub rating_count: u64,
    pub rank: u64,
}
