//! Storage-backed tests. They need a scratch Postgres and Redis:
//!
//! DATABASE_URL=... REDIS_URL=... cargo test --test test_postgres -- --ignored

use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use chrono::{Duration, Utc};
use fratrank_be::{
    db::{
        campus::post::create_campus,
        chat::get::get_campus_chat,
        comment::post::create_party_comment,
        fraternity::post::create_fraternity,
        leaderboard::get::get_leaderboard,
        party::post::create_party,
        rating::put::{upsert_party_rating, upsert_reputation_rating},
        vote::{
            lock::{acquire_vote_lock, with_vote_lock},
            patch::{apply_vote, vote_with_lock},
        },
    },
    errors::AppError,
    models::{
        campus::Campus,
        chat::ChatSort,
        party::Party,
        redis::RedisKey,
        vote::{VoteTarget, VoteValue},
    },
    state::RedisClient,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

async fn connect() -> Option<(PgPool, RedisClient)> {
    let (Ok(database_url), Ok(redis_url)) =
        (std::env::var("DATABASE_URL"), std::env::var("REDIS_URL"))
    else {
        eprintln!("DATABASE_URL and REDIS_URL must be set, skipping");
        return None;
    };

    let postgres = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("connect to Postgres");
    sqlx::migrate!("./migrations")
        .run(&postgres)
        .await
        .expect("run migrations");

    let manager = RedisConnectionManager::new(redis_url).expect("redis url");
    let redis = Pool::builder().build(manager).await.expect("connect to Redis");

    Some((postgres, redis))
}

async fn seed_campus(postgres: &PgPool) -> Campus {
    let slug = format!("test-{}", Uuid::new_v4().simple());
    create_campus("Test State".into(), slug, postgres.clone())
        .await
        .expect("create campus")
}

async fn seed_party(postgres: &PgPool, redis: &RedisClient) -> (Campus, Party) {
    let campus = seed_campus(postgres).await;
    let fraternity = create_fraternity(
        campus.id,
        "Alpha Test".into(),
        None,
        None,
        postgres.clone(),
        redis.clone(),
    )
    .await
    .expect("create fraternity");

    let starts_at = Utc::now() - Duration::hours(3);
    let party = create_party(
        fraternity.id,
        "Backyard Bash".into(),
        None,
        None,
        starts_at,
        Some(starts_at + Duration::hours(2)),
        postgres.clone(),
    )
    .await
    .expect("create party");

    (campus, party)
}

async fn redis_get(redis: &RedisClient, key: &str) -> Option<String> {
    let mut conn = redis.get().await.unwrap();
    redis::cmd("GET").arg(key).query_async(&mut *conn).await.unwrap()
}

async fn stored_counts(postgres: &PgPool, comment_id: Uuid) -> (i64, i64) {
    sqlx::query_as::<_, (i64, i64)>("SELECT upvotes, downvotes FROM party_comments WHERE id = $1")
        .bind(comment_id)
        .fetch_one(postgres)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_second_submission_in_flight_gets_conflict() {
    let Some((_, redis)) = connect().await else {
        return;
    };
    let key = RedisKey::vote_lock(VoteTarget::Comment, Uuid::new_v4(), Uuid::new_v4());

    let held = acquire_vote_lock(&key, 5000, redis.clone())
        .await
        .unwrap()
        .expect("first caller takes the lock");

    let second = with_vote_lock(&key, 5000, redis.clone(), async { Ok::<_, AppError>(()) }).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    held.release().await;
    let third = with_vote_lock(&key, 5000, redis.clone(), async { Ok::<_, AppError>(7) }).await;
    assert_eq!(third.unwrap(), 7);
    assert_eq!(redis_get(&redis, &key).await, None);
}

#[tokio::test]
#[ignore]
async fn test_release_leaves_a_newer_holder_alone() {
    let Some((_, redis)) = connect().await else {
        return;
    };
    let key = RedisKey::vote_lock(VoteTarget::Photo, Uuid::new_v4(), Uuid::new_v4());

    let stale = acquire_vote_lock(&key, 5000, redis.clone())
        .await
        .unwrap()
        .unwrap();

    // The TTL ran out and another request took the key
    {
        let mut conn = redis.get().await.unwrap();
        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg("newer-holder")
            .query_async(&mut *conn)
            .await
            .unwrap();
    }

    stale.release().await;
    assert_eq!(redis_get(&redis, &key).await.as_deref(), Some("newer-holder"));

    let mut conn = redis.get().await.unwrap();
    let _: u32 = redis::cmd("DEL").arg(&key).query_async(&mut *conn).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_dropped_lock_is_freed() {
    let Some((_, redis)) = connect().await else {
        return;
    };
    let key = RedisKey::vote_lock(VoteTarget::Chat, Uuid::new_v4(), Uuid::new_v4());

    let lock = acquire_vote_lock(&key, 60_000, redis.clone())
        .await
        .unwrap()
        .unwrap();
    drop(lock);

    let mut freed = false;
    for _ in 0..50 {
        if redis_get(&redis, &key).await.is_none() {
            freed = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(freed);
}

#[tokio::test]
#[ignore]
async fn test_rating_twice_updates_in_place() {
    let Some((postgres, redis)) = connect().await else {
        return;
    };
    let (_, party) = seed_party(&postgres, &redis).await;
    let user = Uuid::new_v4();

    let first = upsert_party_rating(party.id, user, 4.0, 5.0, 6.0, postgres.clone(), redis.clone())
        .await
        .unwrap();
    let second = upsert_party_rating(party.id, user, 9.0, 8.0, 12.0, postgres.clone(), redis.clone())
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!((second.vibe, second.music, second.execution), (9.0, 8.0, 10.0));

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM party_ratings WHERE party_id = $1 AND user_id = $2",
    )
    .bind(party.id)
    .bind(user)
    .fetch_one(&postgres)
    .await
    .unwrap();
    assert_eq!(rows, 1);

    let first = upsert_reputation_rating(
        party.fraternity_id,
        user,
        3.0,
        3.0,
        3.0,
        postgres.clone(),
        redis.clone(),
    )
    .await
    .unwrap();
    let second = upsert_reputation_rating(
        party.fraternity_id,
        user,
        7.0,
        8.0,
        9.0,
        postgres.clone(),
        redis.clone(),
    )
    .await
    .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.community, 9.0);

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reputation_ratings WHERE fraternity_id = $1 AND user_id = $2",
    )
    .bind(party.fraternity_id)
    .bind(user)
    .fetch_one(&postgres)
    .await
    .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore]
async fn test_vote_toggle_restores_stored_counts() {
    let Some((postgres, redis)) = connect().await else {
        return;
    };
    let (_, party) = seed_party(&postgres, &redis).await;
    let comment = create_party_comment(
        party.id,
        Uuid::new_v4(),
        "best DJ all year".into(),
        postgres.clone(),
    )
    .await
    .unwrap();

    let fan = Uuid::new_v4();
    let critic = Uuid::new_v4();
    let voter = Uuid::new_v4();

    apply_vote(VoteTarget::Comment, comment.id, fan, VoteValue::Up, postgres.clone())
        .await
        .unwrap();
    apply_vote(VoteTarget::Comment, comment.id, critic, VoteValue::Down, postgres.clone())
        .await
        .unwrap();

    let before = stored_counts(&postgres, comment.id).await;
    assert_eq!(before, (1, 1));

    let on = vote_with_lock(
        VoteTarget::Comment,
        comment.id,
        voter,
        VoteValue::Up,
        5000,
        postgres.clone(),
        redis.clone(),
    )
    .await
    .unwrap();
    assert_eq!((on.user_vote, on.upvotes, on.downvotes), (1, 2, 1));

    let off = vote_with_lock(
        VoteTarget::Comment,
        comment.id,
        voter,
        VoteValue::Up,
        5000,
        postgres.clone(),
        redis.clone(),
    )
    .await
    .unwrap();
    assert_eq!(off.user_vote, 0);
    assert_eq!(stored_counts(&postgres, comment.id).await, before);

    let again = vote_with_lock(
        VoteTarget::Comment,
        comment.id,
        voter,
        VoteValue::Up,
        5000,
        postgres.clone(),
        redis.clone(),
    )
    .await
    .unwrap();
    assert_eq!((again.upvotes, again.downvotes), (2, 1));

    let switched = apply_vote(VoteTarget::Comment, comment.id, voter, VoteValue::Down, postgres.clone())
        .await
        .unwrap();
    assert_eq!((switched.user_vote, switched.upvotes, switched.downvotes), (-1, 1, 2));
    assert_eq!(stored_counts(&postgres, comment.id).await, (1, 2));
}

#[tokio::test]
#[ignore]
async fn test_hot_chat_includes_old_messages() {
    let Some((postgres, _)) = connect().await else {
        return;
    };
    let campus = seed_campus(&postgres).await;

    for hours in [96, 100, 120] {
        sqlx::query(
            "INSERT INTO chat_messages (campus_id, user_id, body, created_at)
            VALUES ($1, $2, 'quiet week', $3)",
        )
        .bind(campus.id)
        .bind(Uuid::new_v4())
        .bind(Utc::now() - Duration::hours(hours))
        .execute(&postgres)
        .await
        .unwrap();
    }

    let new = get_campus_chat(campus.id, ChatSort::New, 50, postgres.clone()).await.unwrap();
    let hot = get_campus_chat(campus.id, ChatSort::Hot, 50, postgres.clone()).await.unwrap();
    assert_eq!(new.len(), 3);
    assert_eq!(hot.len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_new_fraternity_appears_on_cached_leaderboard() {
    let Some((postgres, redis)) = connect().await else {
        return;
    };
    let campus = seed_campus(&postgres).await;

    let empty = get_leaderboard(campus.id, 300, postgres.clone(), redis.clone())
        .await
        .unwrap();
    assert!(empty.is_empty());

    let fraternity = create_fraternity(
        campus.id,
        "Late Chapter".into(),
        None,
        None,
        postgres.clone(),
        redis.clone(),
    )
    .await
    .unwrap();

    let leaderboard = get_leaderboard(campus.id, 300, postgres.clone(), redis.clone())
        .await
        .unwrap();
    assert_eq!(leaderboard.len(), 1);
    assert_eq!(leaderboard[0].fraternity.id, fraternity.id);
}
