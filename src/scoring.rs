//! Score aggregation for leaderboards, party summaries and feed ranking.
//!
//! Every sub-score is a mean over a fraternity's ratings pulled toward the
//! neutral score by a prior weight, so that a single 10/10 rating does not
//! outrank a long history of 8s.

use std::{cmp::Ordering, collections::HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    chat::ChatMessage,
    fraternity::Fraternity,
    leaderboard::{LeaderBoard, PartyLeaderBoard, ScoreBreakdown},
    party::{Party, RatingSummary},
    photo::PartyPhoto,
    rating::{PartyRatingSample, ReputationSample},
};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;
pub const NEUTRAL_SCORE: f64 = 5.0;

pub const REPUTATION_PRIOR_WEIGHT: f64 = 5.0;
pub const PARTY_PRIOR_WEIGHT: f64 = 3.0;
pub const TRENDING_PRIOR_WEIGHT: f64 = 2.0;
pub const CONFIDENCE_PRIOR_WEIGHT: f64 = 5.0;

pub const TRENDING_WINDOW_DAYS: f64 = 14.0;
pub const TRENDING_HALF_LIFE_DAYS: f64 = 3.5;

pub const REPUTATION_WEIGHT: f64 = 0.5;
pub const PARTY_WEIGHT: f64 = 0.35;
pub const TRENDING_WEIGHT: f64 = 0.15;

pub fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

pub fn combined(a: f64, b: f64, c: f64) -> f64 {
    clamp_score((a + b + c) / 3.0)
}

pub fn shrink(mean: f64, n: f64, prior_weight: f64) -> f64 {
    if n + prior_weight <= 0.0 {
        return NEUTRAL_SCORE;
    }
    clamp_score((mean * n + NEUTRAL_SCORE * prior_weight) / (n + prior_weight))
}

pub fn confidence(n: f64, prior_weight: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    n / (n + prior_weight)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn reputation_score(samples: &[&ReputationSample]) -> Option<f64> {
    let values: Vec<f64> = samples
        .iter()
        .map(|s| combined(s.brotherhood, s.reputation, s.community))
        .collect();

    mean(&values).map(|m| shrink(m, values.len() as f64, REPUTATION_PRIOR_WEIGHT))
}

pub fn party_score(samples: &[&PartyRatingSample]) -> Option<f64> {
    let values: Vec<f64> = samples
        .iter()
        .map(|s| combined(s.vibe, s.music, s.execution))
        .collect();

    mean(&values).map(|m| shrink(m, values.len() as f64, PARTY_PRIOR_WEIGHT))
}

/// Exponentially decayed mean of party ratings inside the trending window.
pub fn trending_score(samples: &[&PartyRatingSample], now: DateTime<Utc>) -> Option<f64> {
    let mut weight_sum = 0.0;
    let mut weighted = 0.0;

    for sample in samples {
        let age_days = (now - sample.rated_at).num_seconds().max(0) as f64 / 86_400.0;
        if age_days > TRENDING_WINDOW_DAYS {
            continue;
        }

        let weight = 0.5_f64.powf(age_days / TRENDING_HALF_LIFE_DAYS);
        weight_sum += weight;
        weighted += weight * combined(sample.vibe, sample.music, sample.execution);
    }

    if weight_sum <= 0.0 {
        return None;
    }

    Some(shrink(weighted / weight_sum, weight_sum, TRENDING_PRIOR_WEIGHT))
}

/// Weighted blend of whichever sub-scores exist, renormalized over them.
pub fn overall(reputation: Option<f64>, party: Option<f64>, trending: Option<f64>) -> Option<f64> {
    let parts = [
        (reputation, REPUTATION_WEIGHT),
        (party, PARTY_WEIGHT),
        (trending, TRENDING_WEIGHT),
    ];

    let (sum, weights) = parts
        .iter()
        .filter_map(|(score, weight)| score.map(|s| (s * weight, *weight)))
        .fold((0.0, 0.0), |(sum, weights), (s, w)| (sum + s, weights + w));

    if weights <= 0.0 {
        None
    } else {
        Some(clamp_score(sum / weights))
    }
}

pub fn breakdown(
    reputation: &[&ReputationSample],
    party_ratings: &[&PartyRatingSample],
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let reputation_score = reputation_score(reputation);
    let party = party_score(party_ratings);
    let trending = trending_score(party_ratings, now);

    ScoreBreakdown {
        reputation: reputation_score,
        party,
        trending,
        overall: overall(reputation_score, party, trending),
        confidence: confidence(
            (reputation.len() + party_ratings.len()) as f64,
            CONFIDENCE_PRIOR_WEIGHT,
        ),
    }
}

fn cmp_optional_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn build_leaderboard(
    fraternities: Vec<Fraternity>,
    reputation: &[ReputationSample],
    party_ratings: &[PartyRatingSample],
    now: DateTime<Utc>,
) -> Vec<LeaderBoard> {
    let mut reputation_by_frat: HashMap<Uuid, Vec<&ReputationSample>> = HashMap::new();
    for sample in reputation {
        reputation_by_frat
            .entry(sample.fraternity_id)
            .or_default()
            .push(sample);
    }

    let mut parties_by_frat: HashMap<Uuid, Vec<&PartyRatingSample>> = HashMap::new();
    for sample in party_ratings {
        parties_by_frat
            .entry(sample.fraternity_id)
            .or_default()
            .push(sample);
    }

    let mut leaderboards: Vec<LeaderBoard> = fraternities
        .into_iter()
        .map(|fraternity| {
            let rep = reputation_by_frat
                .get(&fraternity.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let parties = parties_by_frat
                .get(&fraternity.id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            LeaderBoard {
                scores: breakdown(rep, parties, now),
                reputation_count: rep.len() as u64,
                party_rating_count: parties.len() as u64,
                fraternity,
                rank: 0, // Will be set after sorting
            }
        })
        .collect();

    // Overall (unscored last), then rating volume, then name
    leaderboards.sort_by(|a, b| {
        cmp_optional_desc(a.scores.overall, b.scores.overall)
            .then_with(|| b.total_ratings().cmp(&a.total_ratings()))
            .then_with(|| a.fraternity.name.cmp(&b.fraternity.name))
    });

    for (index, leaderboard) in leaderboards.iter_mut().enumerate() {
        leaderboard.rank = (index + 1) as u64;
    }

    leaderboards
}

pub fn summarize_party(samples: &[&PartyRatingSample]) -> RatingSummary {
    let vibe: Vec<f64> = samples.iter().map(|s| s.vibe).collect();
    let music: Vec<f64> = samples.iter().map(|s| s.music).collect();
    let execution: Vec<f64> = samples.iter().map(|s| s.execution).collect();
    let overall: Vec<f64> = samples
        .iter()
        .map(|s| combined(s.vibe, s.music, s.execution))
        .collect();

    RatingSummary {
        rating_count: samples.len() as u64,
        vibe: mean(&vibe),
        music: mean(&music),
        execution: mean(&execution),
        overall: mean(&overall),
    }
}

/// Ranks parties that have at least one rating; unrated parties are left out.
pub fn build_party_leaderboard(
    parties: Vec<Party>,
    party_ratings: &[PartyRatingSample],
) -> Vec<PartyLeaderBoard> {
    let mut by_party: HashMap<Uuid, Vec<&PartyRatingSample>> = HashMap::new();
    for sample in party_ratings {
        by_party.entry(sample.party_id).or_default().push(sample);
    }

    let mut entries: Vec<PartyLeaderBoard> = parties
        .into_iter()
        .filter_map(|party| {
            let samples = by_party.get(&party.id)?;
            let score = party_score(samples)?;

            Some(PartyLeaderBoard {
                fraternity_id: party.fraternity_id,
                rating_count: samples.len() as u64,
                score,
                party,
                rank: 0,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.rating_count.cmp(&a.rating_count))
            .then_with(|| b.party.starts_at.cmp(&a.party.starts_at))
    });

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = (index + 1) as u64;
    }

    entries
}

/// Highest net score wins, the most recent photo breaks ties.
pub fn select_cover(photos: &[PartyPhoto]) -> Option<&PartyPhoto> {
    photos.iter().max_by(|a, b| {
        a.net_score()
            .cmp(&b.net_score())
            .then_with(|| a.created_at.cmp(&b.created_at))
    })
}

pub fn hot_rank(upvotes: i64, downvotes: i64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_hours = (now - created_at).num_seconds().max(0) as f64 / 3_600.0;
    (upvotes - downvotes) as f64 / (age_hours + 2.0).powf(1.5)
}

/// Orders messages by hot rank, newest first on ties, and keeps `limit`.
pub fn rank_hot(
    mut messages: Vec<ChatMessage>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<ChatMessage> {
    messages.sort_by(|a, b| {
        let a_rank = hot_rank(a.upvotes, a.downvotes, a.created_at, now);
        let b_rank = hot_rank(b.upvotes, b.downvotes, b.created_at, now);
        b_rank
            .partial_cmp(&a_rank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    messages.truncate(limit);
    messages
}
