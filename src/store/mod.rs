//! Keyed JSON entity store backing the offline/demo client.
//!
//! Each entity is a single JSON array under `fratrank_<entity>`. Writes that
//! exceed the per-key quota evict the oldest half of the records and retry
//! once.

pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    config::{Config, StoreBackendKind},
    errors::AppError,
    models::redis::RedisKey,
    state::RedisClient,
};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

pub const DEFAULT_SORT: &str = "-created_date";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{key} needs {bytes} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        bytes: usize,
        quota: usize,
    },

    #[error("Stored value under {key} is unreadable: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::QuotaExceeded { .. } => AppError::QuotaExceeded(e.to_string()),
            StoreError::Corrupt { .. } => AppError::Deserialization(e.to_string()),
            StoreError::Backend(msg) => AppError::RedisPoolError(msg),
        }
    }
}

#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Missing keys read as an empty collection.
    async fn read(&self, key: &str) -> Result<Vec<Value>, StoreError>;

    async fn write(&self, key: &str, records: &[Value]) -> Result<(), StoreError>;

    /// Serializes read-modify-write cycles issued through this backend.
    fn write_lock(&self) -> &Mutex<()>;
}

pub fn build_backend(config: &Config, redis: RedisClient) -> Arc<dyn StoreBackend> {
    match config.store_backend {
        StoreBackendKind::Redis => Arc::new(RedisStore::new(redis, config.store_quota_bytes)),
        StoreBackendKind::Memory => Arc::new(MemoryStore::new(config.store_quota_bytes)),
    }
}

pub(crate) fn encode_records(
    key: &str,
    records: &[Value],
    quota_bytes: usize,
) -> Result<String, StoreError> {
    let encoded =
        serde_json::to_string(records).map_err(|e| StoreError::Backend(e.to_string()))?;

    if encoded.len() > quota_bytes {
        return Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            bytes: encoded.len(),
            quota: quota_bytes,
        });
    }

    Ok(encoded)
}

pub fn is_valid_entity_name(entity: &str) -> bool {
    (1..=32).contains(&entity.len()) && entity.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: BTreeMap<String, String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

impl ListQuery {
    /// `sort` and `limit` are reserved, every other parameter is a filter.
    pub fn from_params(params: BTreeMap<String, String>) -> Result<Self, AppError> {
        let mut query = ListQuery::default();

        for (key, value) in params {
            match key.as_str() {
                "sort" => query.sort = Some(value),
                "limit" => {
                    let limit = value.parse::<usize>().map_err(|e| {
                        AppError::BadRequest(format!("Invalid limit '{}': {}", value, e))
                    })?;
                    query.limit = Some(limit);
                }
                _ => {
                    query.filter.insert(key, value);
                }
            }
        }

        Ok(query)
    }
}

/// Query strings carry text, so the expected value is read in the stored type.
fn field_matches(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => match (n.as_f64(), expected.trim().parse::<f64>()) {
            (Some(stored), Ok(wanted)) => stored == wanted,
            _ => false,
        },
        Some(Value::Bool(b)) => expected.parse::<bool>().is_ok_and(|wanted| *b == wanted),
        Some(Value::Null) => expected == "null",
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

pub fn matches_filter(record: &Value, filter: &BTreeMap<String, String>) -> bool {
    filter
        .iter()
        .all(|(field, expected)| field_matches(record.get(field), expected))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

fn cmp_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Missing and null fields sort last in both directions.
pub fn compare_by_field(a: &Value, b: &Value, sort: &str) -> Ordering {
    let (field, descending) = match sort.strip_prefix('-') {
        Some(field) => (field, true),
        None => (sort, false),
    };

    let a = a.get(field).filter(|v| !v.is_null());
    let b = b.get(field).filter(|v| !v.is_null());

    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = cmp_present(a, b);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn apply_query(records: Vec<Value>, query: &ListQuery) -> Vec<Value> {
    let sort = query.sort.as_deref().unwrap_or(DEFAULT_SORT);

    let mut matched: Vec<Value> = records
        .into_iter()
        .filter(|r| matches_filter(r, &query.filter))
        .collect();
    matched.sort_by(|a, b| compare_by_field(a, b, sort));

    if let Some(limit) = query.limit {
        matched.truncate(limit);
    }

    matched
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Drops the oldest half by `created_date`, never the protected record.
pub fn evict_oldest_half(records: Vec<Value>, protect_id: &str) -> Vec<Value> {
    let evict_count = records.len() / 2;
    if evict_count == 0 {
        return records;
    }

    let mut candidates: Vec<(usize, &Value)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| record_id(r) != Some(protect_id))
        .collect();
    candidates.sort_by(|(_, a), (_, b)| compare_by_field(a, b, "created_date"));

    // Undated records go first, they cannot be placed in time
    candidates.sort_by_key(|(_, r)| r.get("created_date").is_some_and(|v| !v.is_null()));

    let evicted: Vec<usize> = candidates
        .into_iter()
        .take(evict_count)
        .map(|(index, _)| index)
        .collect();

    records
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !evicted.contains(index))
        .map(|(_, r)| r)
        .collect()
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn into_object(record: Value) -> Result<Map<String, Value>, AppError> {
    match record {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest("Record must be a JSON object".into())),
    }
}

pub struct EntityStore<'a> {
    backend: &'a dyn StoreBackend,
    entity: String,
    key: String,
}

impl<'a> EntityStore<'a> {
    pub fn new(backend: &'a dyn StoreBackend, entity: &str) -> Result<Self, AppError> {
        if !is_valid_entity_name(entity) {
            return Err(AppError::BadRequest(format!(
                "Invalid entity name '{}'",
                entity
            )));
        }

        Ok(Self {
            backend,
            entity: entity.to_string(),
            key: RedisKey::demo_entity(entity),
        })
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, AppError> {
        let records = self.backend.read(&self.key).await?;
        Ok(apply_query(records, query))
    }

    pub async fn get(&self, id: &str) -> Result<Value, AppError> {
        let records = self.backend.read(&self.key).await?;
        records
            .into_iter()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", self.entity, id)))
    }

    pub async fn create(&self, record: Value) -> Result<Value, AppError> {
        let mut fields = into_object(record)?;

        let id = match fields.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        fields.insert("id".into(), Value::String(id.clone()));
        fields.insert("created_date".into(), Value::String(now_stamp()));
        let record = Value::Object(fields);

        let _guard = self.backend.write_lock().lock().await;
        let mut records = self.backend.read(&self.key).await?;

        if records.iter().any(|r| record_id(r) == Some(id.as_str())) {
            return Err(AppError::Conflict(format!(
                "{} {} already exists",
                self.entity, id
            )));
        }

        records.push(record.clone());
        self.write_with_eviction(records, &id).await?;

        tracing::info!("Created demo {} {}", self.entity, id);
        Ok(record)
    }

    /// Shallow merge; `id` and `created_date` are kept from the stored record.
    pub async fn update(&self, id: &str, patch: Value) -> Result<Value, AppError> {
        let patch = into_object(patch)?;

        let _guard = self.backend.write_lock().lock().await;
        let mut records = self.backend.read(&self.key).await?;

        let position = records
            .iter()
            .position(|r| record_id(r) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", self.entity, id)))?;

        let mut fields = into_object(records[position].clone())?;
        for (field, value) in patch {
            if field == "id" || field == "created_date" {
                continue;
            }
            fields.insert(field, value);
        }
        fields.insert("updated_date".into(), Value::String(now_stamp()));

        let updated = Value::Object(fields);
        records[position] = updated.clone();
        self.write_with_eviction(records, id).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.backend.write_lock().lock().await;
        let mut records = self.backend.read(&self.key).await?;

        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(AppError::NotFound(format!(
                "{} {} not found",
                self.entity, id
            )));
        }

        // Shrinking can still fail if the quota was lowered since the last write
        self.write_with_eviction(records, id).await?;
        tracing::info!("Deleted demo {} {}", self.entity, id);
        Ok(())
    }

    async fn write_with_eviction(&self, records: Vec<Value>, protect_id: &str) -> Result<(), AppError> {
        match self.backend.write(&self.key, &records).await {
            Ok(()) => Ok(()),
            Err(StoreError::QuotaExceeded { bytes, quota, .. }) => {
                let kept = evict_oldest_half(records, protect_id);
                tracing::warn!(
                    "Demo store {} over quota ({} > {} bytes), retrying with {} records",
                    self.key,
                    bytes,
                    quota,
                    kept.len()
                );
                self.backend.write(&self.key, &kept).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
