use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    state::RedisClient,
    store::{StoreBackend, StoreError, encode_records},
};

pub struct RedisStore {
    redis: RedisClient,
    quota_bytes: usize,
    write_lock: Mutex<()>,
}

impl RedisStore {
    pub fn new(redis: RedisClient, quota_bytes: usize) -> Self {
        Self {
            redis,
            quota_bytes,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl StoreBackend for RedisStore {
    async fn read(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        let mut conn = self
            .redis
            .get()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, key: &str, records: &[Value]) -> Result<(), StoreError> {
        let encoded = encode_records(key, records, self.quota_bytes)?;

        let mut conn = self
            .redis
            .get()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(encoded)
            .query_async(&mut *conn)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!("Stored {} demo records under {}", records.len(), key);
        Ok(())
    }

    fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}
