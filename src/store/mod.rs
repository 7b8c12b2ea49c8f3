//! Abstract key→document store
//!
//! The bridge treats its cache as an external, already-concurrent-safe
//! key/value store with TTLs: serialized registration documents go in under
//! their `@id`, and expire on their own. [`memory`] provides the in-process
//! implementation used by the standalone server and by tests.

pub mod memory;

#[cfg(test)]
use mockall::automock;

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("document serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Trait for the document store the bridge publishes to and reads from.
///
/// Implementations handle their own concurrency and expiry; the bridge adds
/// no locking of its own.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by key. Expired or absent entries are `None`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Stores a document under `key` for at most `ttl`.
    async fn put(&self, key: &str, document: Value, ttl: Duration) -> Result<(), StoreError>;
}
