//! Record store - generic CRUD over typed collections
//!
//! Persistence lives in an external service; this crate only needs a
//! narrow client surface with server-enforced uniqueness on record
//! keys, which the schedule manager relies on for idempotent upserts.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(String),

    #[error("record not found: {collection}/{key}")]
    NotFound { collection: String, key: String },
}

/// Whether an upsert created a new record or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Client surface of the external record store.
///
/// `upsert` is keyed by a unique identifier the server enforces:
/// submitting the same key twice updates the record rather than
/// inserting a duplicate, with no client-side idempotency check.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        record: Value,
    ) -> Result<UpsertOutcome, StoreError>;

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;
}

/// In-memory record store (for testing or ephemeral use)
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        record: Value,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection.to_string()).or_default();
        match records.insert(key.to_string(), record) {
            Some(_) => Ok(UpsertOutcome::Updated),
            None => Ok(UpsertOutcome::Created),
        }
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|records| records.remove(key));
        if removed.is_none() {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }
}
