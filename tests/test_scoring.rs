use chrono::{DateTime, Duration, Utc};
use fratrank_be::{
    models::{
        chat::ChatMessage,
        fraternity::Fraternity,
        party::Party,
        photo::PartyPhoto,
        rating::{PartyRatingSample, ReputationSample},
    },
    scoring::{
        build_leaderboard, build_party_leaderboard, clamp_score, combined, confidence, hot_rank,
        overall, rank_hot, reputation_score, select_cover, shrink, summarize_party, trending_score,
    },
};
use uuid::Uuid;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn fraternity(name: &str) -> Fraternity {
    Fraternity {
        id: Uuid::new_v4(),
        campus_id: Uuid::nil(),
        name: name.to_string(),
        chapter: None,
        description: None,
        created_at: Utc::now(),
    }
}

fn reputation(fraternity_id: Uuid, score: f64) -> ReputationSample {
    ReputationSample {
        fraternity_id,
        brotherhood: score,
        reputation: score,
        community: score,
        rated_at: Utc::now(),
    }
}

fn party_rating(
    fraternity_id: Uuid,
    party_id: Uuid,
    score: f64,
    rated_at: DateTime<Utc>,
) -> PartyRatingSample {
    PartyRatingSample {
        fraternity_id,
        party_id,
        vibe: score,
        music: score,
        execution: score,
        rated_at,
    }
}

fn photo(upvotes: i64, downvotes: i64, minutes_ago: i64) -> PartyPhoto {
    PartyPhoto {
        id: Uuid::new_v4(),
        party_id: Uuid::nil(),
        user_id: Uuid::nil(),
        url: "https://cdn.example.com/p.jpg".to_string(),
        caption: None,
        upvotes,
        downvotes,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[test]
fn test_clamp_and_combine() {
    assert_eq!(clamp_score(12.5), 10.0);
    assert_eq!(clamp_score(-3.0), 0.0);
    assert_eq!(clamp_score(7.25), 7.25);

    assert!(approx(combined(6.0, 7.0, 8.0), 7.0));
    assert!(approx(combined(10.0, 10.0, 10.0), 10.0));
}

#[test]
fn test_shrink_pulls_toward_neutral() {
    // (9 * 5 + 5 * 5) / 10
    assert!(approx(shrink(9.0, 5.0, 5.0), 7.0));
    assert!(approx(shrink(1.0, 0.0, 5.0), 5.0));

    // More evidence means less pull
    assert!(shrink(9.0, 50.0, 5.0) > shrink(9.0, 5.0, 5.0));

    assert_eq!(confidence(0.0, 5.0), 0.0);
    assert!(approx(confidence(5.0, 5.0), 0.5));
}

#[test]
fn test_single_perfect_rating_is_tempered() {
    let frat = Uuid::new_v4();
    let sample = reputation(frat, 10.0);
    let score = reputation_score(&[&sample]).unwrap();

    // (10 + 5 * 5) / 6
    assert!(approx(score, 35.0 / 6.0));
    assert!(reputation_score(&[]).is_none());
}

#[test]
fn test_overall_renormalizes_missing_parts() {
    assert_eq!(overall(None, None, None), None);
    assert!(approx(overall(Some(8.0), None, None).unwrap(), 8.0));

    let blended = overall(Some(8.0), Some(6.0), None).unwrap();
    assert!(approx(blended, (8.0 * 0.5 + 6.0 * 0.35) / 0.85));

    let all = overall(Some(8.0), Some(6.0), Some(4.0)).unwrap();
    assert!(approx(all, 8.0 * 0.5 + 6.0 * 0.35 + 4.0 * 0.15));
}

#[test]
fn test_trending_decays_and_windows() {
    let now = Utc::now();
    let frat = Uuid::new_v4();
    let party = Uuid::new_v4();

    let stale = party_rating(frat, party, 9.0, now - Duration::days(20));
    assert!(trending_score(&[&stale], now).is_none());

    // Weights 1.0 and 0.25 after two half-lives
    let fresh = party_rating(frat, party, 10.0, now);
    let week_old = party_rating(frat, party, 0.0, now - Duration::days(7));
    let score = trending_score(&[&fresh, &week_old], now).unwrap();

    let mean = 10.0 / 1.25;
    let expected = (mean * 1.25 + 5.0 * 2.0) / (1.25 + 2.0);
    assert!((score - expected).abs() < 1e-6);
}

#[test]
fn test_leaderboard_prefers_consistent_history() {
    let now = Utc::now();
    let steady = fraternity("Alpha Beta");
    let one_hit = fraternity("Gamma Delta");
    let unrated_b = fraternity("Zeta Eta");
    let unrated_a = fraternity("Omega Psi");

    let mut reputation_samples: Vec<ReputationSample> =
        (0..20).map(|_| reputation(steady.id, 8.0)).collect();
    reputation_samples.push(reputation(one_hit.id, 10.0));

    let leaderboard = build_leaderboard(
        vec![
            unrated_b.clone(),
            one_hit.clone(),
            steady.clone(),
            unrated_a.clone(),
        ],
        &reputation_samples,
        &[],
        now,
    );

    let names: Vec<&str> = leaderboard
        .iter()
        .map(|entry| entry.fraternity.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha Beta", "Gamma Delta", "Omega Psi", "Zeta Eta"]);

    let ranks: Vec<u64> = leaderboard.iter().map(|entry| entry.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);

    let top = &leaderboard[0];
    assert_eq!(top.reputation_count, 20);
    assert!(approx(top.scores.reputation.unwrap(), 7.4));
    assert!(top.scores.party.is_none());
    assert!(approx(top.scores.overall.unwrap(), 7.4));
    assert!(approx(top.scores.confidence, 0.8));

    assert!(leaderboard[2].scores.overall.is_none());
}

#[test]
fn test_leaderboard_combines_party_ratings() {
    let now = Utc::now();
    let host = fraternity("Kappa Sigma");
    let party = Uuid::new_v4();

    let party_samples = vec![
        party_rating(host.id, party, 9.0, now - Duration::hours(2)),
        party_rating(host.id, party, 7.0, now - Duration::hours(1)),
    ];

    let leaderboard = build_leaderboard(vec![host], &[], &party_samples, now);
    let entry = &leaderboard[0];

    assert_eq!(entry.party_rating_count, 2);
    // (8 * 2 + 5 * 3) / 5
    assert!(approx(entry.scores.party.unwrap(), 6.2));
    assert!(entry.scores.trending.is_some());
    assert!(entry.scores.reputation.is_none());

    let overall = entry.scores.overall.unwrap();
    assert!((0.0..=10.0).contains(&overall));
}

#[test]
fn test_party_summary_means() {
    let frat = Uuid::new_v4();
    let party = Uuid::new_v4();
    let a = PartyRatingSample {
        fraternity_id: frat,
        party_id: party,
        vibe: 8.0,
        music: 6.0,
        execution: 4.0,
        rated_at: Utc::now(),
    };
    let b = PartyRatingSample {
        vibe: 10.0,
        music: 8.0,
        execution: 6.0,
        ..a.clone()
    };

    let summary = summarize_party(&[&a, &b]);
    assert_eq!(summary.rating_count, 2);
    assert!(approx(summary.vibe.unwrap(), 9.0));
    assert!(approx(summary.music.unwrap(), 7.0));
    assert!(approx(summary.execution.unwrap(), 5.0));
    assert!(approx(summary.overall.unwrap(), 7.0));

    let empty = summarize_party(&[]);
    assert_eq!(empty.rating_count, 0);
    assert!(empty.overall.is_none());
}

#[test]
fn test_party_leaderboard_skips_unrated() {
    let now = Utc::now();
    let frat = Uuid::new_v4();
    let make_party = |title: &str| Party {
        id: Uuid::new_v4(),
        fraternity_id: frat,
        campus_id: Uuid::nil(),
        title: title.to_string(),
        theme: None,
        venue: None,
        starts_at: now - Duration::days(2),
        ends_at: None,
        created_at: now - Duration::days(3),
    };

    let good = make_party("Neon Night");
    let bad = make_party("Toga Flop");
    let quiet = make_party("Study Break");

    let samples = vec![
        party_rating(frat, good.id, 9.0, now),
        party_rating(frat, good.id, 9.5, now),
        party_rating(frat, bad.id, 2.0, now),
    ];

    let leaderboard = build_party_leaderboard(vec![bad, quiet, good], &samples);
    assert_eq!(leaderboard.len(), 2);
    assert_eq!(leaderboard[0].party.title, "Neon Night");
    assert_eq!(leaderboard[0].rank, 1);
    assert_eq!(leaderboard[1].party.title, "Toga Flop");
    assert_eq!(leaderboard[1].rating_count, 1);
}

#[test]
fn test_cover_photo_selection() {
    assert!(select_cover(&[]).is_none());

    let photos = vec![photo(3, 1, 30), photo(5, 0, 60), photo(6, 1, 5)];
    let cover = select_cover(&photos).unwrap();
    // Net 5 twice, the newer one wins
    assert_eq!(cover.id, photos[2].id);

    let photos = vec![photo(1, 0, 1), photo(4, 0, 600)];
    assert_eq!(select_cover(&photos).unwrap().id, photos[1].id);
}

#[test]
fn test_hot_rank_favors_recent_posts() {
    let now = Utc::now();
    let fresh = hot_rank(10, 0, now - Duration::minutes(10), now);
    let old = hot_rank(10, 0, now - Duration::hours(20), now);
    assert!(fresh > old);

    assert!(hot_rank(0, 4, now, now) < 0.0);
    assert_eq!(hot_rank(2, 2, now, now), 0.0);
}

fn chat(upvotes: i64, downvotes: i64, hours_ago: i64, now: DateTime<Utc>) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4(),
        campus_id: Uuid::nil(),
        user_id: Uuid::nil(),
        body: "anyone at the foam party?".to_string(),
        party_id: None,
        fraternity_id: None,
        upvotes,
        downvotes,
        created_at: now - Duration::hours(hours_ago),
    }
}

#[test]
fn test_hot_feed_keeps_old_messages_on_quiet_campus() {
    let now = Utc::now();
    // Everything is four days old
    let messages = vec![chat(0, 0, 100, now), chat(3, 0, 98, now), chat(0, 2, 96, now)];

    let ranked = rank_hot(messages.clone(), 50, now);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].id, messages[1].id);
    assert_eq!(ranked[1].id, messages[0].id);
    assert_eq!(ranked[2].id, messages[2].id);
}

#[test]
fn test_hot_feed_orders_and_limits() {
    let now = Utc::now();
    let messages = vec![
        chat(10, 0, 48, now),
        chat(4, 0, 1, now),
        chat(0, 0, 0, now),
        chat(0, 0, 2, now),
    ];

    let ranked = rank_hot(messages.clone(), 3, now);
    assert_eq!(ranked.len(), 3);
    // Fresh votes beat an old pile of votes
    assert_eq!(ranked[0].id, messages[1].id);
    assert_eq!(ranked[1].id, messages[0].id);
    // Equal rank falls back to newest first
    assert_eq!(ranked[2].id, messages[2].id);
}
