use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};

use crate::store::{StoreBackend, StoreError, encode_records};

/// Process-local backend, used for demo mode without Redis and in tests.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: usize,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn read(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(raw) => serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, key: &str, records: &[Value]) -> Result<(), StoreError> {
        let encoded = encode_records(key, records, self.quota_bytes)?;
        self.entries.write().await.insert(key.to_string(), encoded);
        Ok(())
    }

    fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}
