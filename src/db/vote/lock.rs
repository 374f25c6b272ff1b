use std::future::Future;

use uuid::Uuid;

use crate::{errors::AppError, state::RedisClient};

/// Deletes the key only while it still carries the caller's token.
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

/// A held in-flight lock. Dropping it without `release` (for example when
/// the request is cancelled) still frees the key in the background.
pub struct VoteLock {
    key: String,
    token: String,
    redis: RedisClient,
    held: bool,
}

impl VoteLock {
    pub async fn release(mut self) {
        self.held = false;
        release_owned(&self.key, &self.token, self.redis.clone()).await;
    }
}

impl Drop for VoteLock {
    fn drop(&mut self) {
        if !self.held {
            return;
        }

        let key = std::mem::take(&mut self.key);
        let token = std::mem::take(&mut self.token);
        let redis = self.redis.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { release_owned(&key, &token, redis).await });
            }
            Err(_) => tracing::warn!("Vote lock {} dropped outside a runtime, left to its TTL", key),
        }
    }
}

async fn release_owned(key: &str, token: &str, redis: RedisClient) {
    let result: Result<i64, AppError> = async {
        let mut conn = redis.get().await?;
        let removed = redis::Script::new(RELEASE_SCRIPT)
            .key(key)
            .arg(token)
            .invoke_async(&mut *conn)
            .await?;
        Ok(removed)
    }
    .await;

    match result {
        Ok(0) => tracing::debug!("Vote lock {} expired or changed hands before release", key),
        Ok(_) => {}
        // The TTL frees it eventually
        Err(e) => tracing::warn!("Failed to release vote lock {}: {}", key, e),
    }
}

/// `SET NX PX` with a fresh token; `None` when someone else holds the key.
pub async fn acquire_vote_lock(
    key: &str,
    ttl_ms: u64,
    redis: RedisClient,
) -> Result<Option<VoteLock>, AppError> {
    let token = Uuid::new_v4().to_string();
    let mut conn = redis.get().await?;

    let reply: Option<String> = redis::cmd("SET")
        .arg(key)
        .arg(&token)
        .arg("NX")
        .arg("PX")
        .arg(ttl_ms.max(1))
        .query_async(&mut *conn)
        .await
        .map_err(AppError::RedisCommandError)?;
    drop(conn);

    Ok(reply.map(|_| VoteLock {
        key: key.to_string(),
        token,
        redis,
        held: true,
    }))
}

/// Runs `work` while holding `key`; a second submission in flight gets a 409.
pub async fn with_vote_lock<F, T>(
    key: &str,
    ttl_ms: u64,
    redis: RedisClient,
    work: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    let Some(lock) = acquire_vote_lock(key, ttl_ms, redis).await? else {
        tracing::debug!("Rejected duplicate vote submission for {}", key);
        return Err(AppError::Conflict(
            "A vote on this item is already being processed".into(),
        ));
    };

    let result = work.await;
    lock.release().await;
    result
}
