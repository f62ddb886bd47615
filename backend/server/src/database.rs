//! # Redis
//!
//! Append-only store for prediction records.
//!
//! ## Requirements
//!
//! - Records are never updated or deleted once written
//! - History is read per user, in insertion order
//! - No cross-record transactions
//!
//! ## Implementation
//!
//! - One Redis list per user: `predictions:{userId}`
//! - Each entry is the JSON encoded record
//! - `RPUSH` to append, `LRANGE 0 -1` to read back oldest first
//! - Ids are UUID v4 strings assigned here, not by the caller
//!
//! An in-memory store with the same contract backs tests and local runs
//! without Redis (`STORE_BACKEND=memory`).
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NewPrediction, PredictionRecord};

pub const PREDICTIONS_KEY: &str = "predictions";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Record encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a new record and returns it with its assigned id.
    async fn insert(&self, prediction: NewPrediction) -> Result<PredictionRecord, StoreError>;

    /// All records for `user_id`, oldest first. Unknown users yield an empty list.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<PredictionRecord>, StoreError>;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn user_key(user_id: &str) -> String {
    format!("{PREDICTIONS_KEY}:{user_id}")
}

/// Decodes stored list entries, skipping any that no longer parse so one
/// corrupt entry does not hide the rest of a user's history.
pub fn decode_entries(user_id: &str, entries: &[String]) -> Vec<PredictionRecord> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_str(entry)
                .inspect_err(|e| warn!("Skipping unreadable record {index} for {user_id}: {e}"))
                .ok()
        })
        .collect()
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StoreError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis");

    Ok(connection_manager)
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(init_redis(redis_url).await?))
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn insert(&self, prediction: NewPrediction) -> Result<PredictionRecord, StoreError> {
        let record = prediction.into_record(new_id());
        let encoded = serde_json::to_string(&record)?;

        let mut connection = self.connection.clone();
        let _: () = connection.rpush(user_key(&record.user_id), encoded).await?;

        #[cfg(feature = "verbose")]
        info!("Stored prediction {} for {}", record.id, record.user_id);

        Ok(record)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<PredictionRecord>, StoreError> {
        let mut connection = self.connection.clone();
        let entries: Vec<String> = connection.lrange(user_key(user_id), 0, -1).await?;

        Ok(decode_entries(user_id, &entries))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<PredictionRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, prediction: NewPrediction) -> Result<PredictionRecord, StoreError> {
        let record = prediction.into_record(new_id());

        self.records
            .write()
            .await
            .entry(record.user_id.clone())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<PredictionRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
