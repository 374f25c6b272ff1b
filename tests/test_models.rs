use chrono::{Duration, NaiveDate, Utc};
use fratrank_be::{
    errors::AppError,
    models::{
        campus::is_valid_slug,
        party::{Party, PartyStatus},
        photo::is_valid_photo_url,
        plan::{PlanOption, PlanTally, is_night_open, parse_night},
        rating::validate_score,
        redis::RedisKey,
    },
    sanitize_text,
};
use uuid::Uuid;

fn party(starts_in_hours: i64, ends_after_hours: Option<i64>) -> Party {
    let starts_at = Utc::now() + Duration::hours(starts_in_hours);
    Party {
        id: Uuid::new_v4(),
        fraternity_id: Uuid::new_v4(),
        campus_id: Uuid::new_v4(),
        title: "Glow Night".to_string(),
        theme: Some("neon".to_string()),
        venue: None,
        starts_at,
        ends_at: ends_after_hours.map(|h| starts_at + Duration::hours(h)),
        created_at: Utc::now() - Duration::days(1),
    }
}

#[test]
fn test_party_status_follows_the_clock() {
    let now = Utc::now();

    let upcoming = party(3, Some(4));
    assert_eq!(upcoming.status_at(now), PartyStatus::Upcoming);
    assert!(!upcoming.is_rateable_at(now));

    let live = party(-1, Some(4));
    assert_eq!(live.status_at(now), PartyStatus::Live);
    assert!(live.is_rateable_at(now));

    let done = party(-10, Some(4));
    assert_eq!(done.status_at(now), PartyStatus::Completed);
    assert!(done.is_rateable_at(now));
}

#[test]
fn test_party_without_end_uses_default_length() {
    let now = Utc::now();

    let still_going = party(-5, None);
    assert_eq!(still_going.status_at(now), PartyStatus::Live);

    let over = party(-7, None);
    assert_eq!(over.status_at(now), PartyStatus::Completed);
    assert_eq!(over.effective_end(), over.starts_at + Duration::hours(6));
}

#[test]
fn test_parse_night() {
    let night = parse_night("2026-10-17").unwrap();
    assert_eq!(night, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());

    assert!(matches!(parse_night("tonight"), Err(AppError::BadRequest(_))));
    assert!(matches!(parse_night("2026-13-01"), Err(AppError::BadRequest(_))));
}

#[test]
fn test_night_voting_window() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

    assert!(is_night_open(today, today));
    assert!(is_night_open(today + Duration::days(3), today));
    assert!(is_night_open(today - Duration::days(1), today));
    assert!(!is_night_open(today - Duration::days(2), today));
}

#[test]
fn test_plan_tally_orders_options() {
    let option = |title: &str, votes: i64| PlanOption {
        party_id: Uuid::new_v4(),
        title: title.to_string(),
        votes,
    };

    let night = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let tally = PlanTally::new(
        Uuid::nil(),
        night,
        vec![option("Bar Crawl", 2), option("Toga", 5), option("Afterparty", 2)],
    );

    let titles: Vec<&str> = tally.options.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, vec!["Toga", "Afterparty", "Bar Crawl"]);
    assert_eq!(tally.total_votes, 9);
}

#[test]
fn test_sanitize_text() {
    assert_eq!(sanitize_text("  hello  ", 10).unwrap(), "hello");
    assert_eq!(
        sanitize_text("<b>loud</b>", 50).unwrap(),
        "&lt;b&gt;loud&lt;/b&gt;"
    );

    assert!(matches!(sanitize_text("   ", 10), Err(AppError::BadRequest(_))));
    assert!(matches!(
        sanitize_text(&"a".repeat(11), 10),
        Err(AppError::BadRequest(_))
    ));

    // Characters, not bytes
    assert!(sanitize_text("éééé", 4).is_ok());
}

#[test]
fn test_validate_score() {
    assert_eq!(validate_score("vibe", 7.5).unwrap(), 7.5);
    assert_eq!(validate_score("vibe", 11.0).unwrap(), 10.0);
    assert_eq!(validate_score("vibe", -2.0).unwrap(), 0.0);
    assert!(matches!(
        validate_score("music", f64::NAN),
        Err(AppError::BadRequest(_))
    ));
    assert!(validate_score("music", f64::INFINITY).is_err());
}

#[test]
fn test_campus_slugs() {
    assert!(is_valid_slug("uc-berkeley"));
    assert!(is_valid_slug("mit"));
    assert!(!is_valid_slug("a"));
    assert!(!is_valid_slug("-ucla"));
    assert!(!is_valid_slug("ucla-"));
    assert!(!is_valid_slug("UCLA"));
    assert!(!is_valid_slug("uc berkeley"));
}

#[test]
fn test_photo_urls() {
    assert!(is_valid_photo_url("https://cdn.example.com/party/1.jpg"));
    assert!(is_valid_photo_url("http://localhost:9000/img.png"));
    assert!(!is_valid_photo_url("https://"));
    assert!(!is_valid_photo_url("ftp://example.com/a.jpg"));
    assert!(!is_valid_photo_url("javascript:alert(1)"));
    assert!(!is_valid_photo_url("https://example.com/a b.jpg"));
    assert!(!is_valid_photo_url(&format!("https://x.io/{}", "a".repeat(2048))));
}

#[test]
fn test_redis_keys() {
    let campus = Uuid::nil();
    let user = Uuid::nil();

    assert_eq!(
        RedisKey::leaderboard(campus),
        format!("leaderboard:{}", campus)
    );
    assert!(RedisKey::plan_lock(campus, user).starts_with("vote_lock:plan:"));
    assert_eq!(RedisKey::demo_entity("party"), "fratrank_party");
}
