//! In-memory TTL document store

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
// tokio's Instant tracks the paused test clock, unlike std's
use tokio::time::Instant;
use tracing::debug;

use crate::store::{DocumentStore, StoreError};

struct Entry {
    document: Value,
    expires_at: Instant,
}

/// A TTL-expiring in-memory document store. Expired entries are dropped
/// lazily: reads treat them as absent, writes sweep them out.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.document.clone()))
    }

    async fn put(&self, key: &str, document: Value, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        debug!("store put: {key} (ttl {}s)", ttl.as_secs());
        entries.insert(
            key.to_string(),
            Entry {
                document,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
