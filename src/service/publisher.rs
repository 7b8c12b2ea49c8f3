//! Stub/full document discipline over the store
//!
//! Pages with more than one leaf are published to the store as standalone
//! documents and replaced in the index by stubs, so the index stays small and
//! deep links hit the store instead of re-running synthesis. Singleton pages
//! ("latest", "prerelease") stay inlined: their marginal size is negligible
//! and clients expect them immediately.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::registration::error::PageError;
use crate::registration::types::{RegistrationIndex, RegistrationPage, standalone_from_anchor};
use crate::store::{DocumentStore, StoreError};

pub struct DocumentPublisher {
    store: Arc<dyn DocumentStore>,
    page_ttl: Duration,
    poll_retries: u32,
    poll_interval: Duration,
}

impl DocumentPublisher {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        page_ttl: Duration,
        poll_retries: u32,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            page_ttl,
            poll_retries,
            poll_interval,
        }
    }

    /// Publishes every multi-leaf page as a standalone document and stubs it
    /// in the returned index: the identifier is rewritten from its anchor
    /// form, `parent` is set, the full page goes into the store, and the
    /// index copy keeps everything but the leaves.
    pub async fn stub_and_publish(
        &self,
        mut index: RegistrationIndex,
    ) -> Result<RegistrationIndex, StoreError> {
        for page in &mut index.items {
            let multi_leaf = page.items.as_ref().is_some_and(|items| items.len() > 1);
            if !multi_leaf {
                continue;
            }
            let Some((parent, standalone)) = standalone_from_anchor(&page.id) else {
                continue;
            };
            page.parent = Some(parent);
            page.id = standalone;

            let full = serde_json::to_value(&*page)?;
            debug!("caching page {}", page.id);
            self.store.put(page.id.as_str(), full, self.page_ttl).await?;

            // Leave the stub behind; bounds, count and parent stay
            page.items = None;
        }
        Ok(index)
    }

    /// Publishes a single standalone page document under its identifier.
    pub async fn publish_page(
        &self,
        page: &RegistrationPage,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let document = serde_json::to_value(page)?;
        debug!("caching page {}", page.id);
        self.store.put(page.id.as_str(), document, ttl).await
    }

    /// Bounded wait for a page that is being populated asynchronously: polls
    /// the store up to the configured retry count with a fixed delay after
    /// each miss, and never falls back to re-running aggregation.
    pub async fn await_page(&self, key: &str) -> Result<Value, PageError> {
        for attempt in 1..=self.poll_retries {
            if let Some(document) = self.store.get(key).await? {
                return Ok(document);
            }
            debug!("page {key} not yet populated (attempt {attempt}), waiting");
            tokio::time::sleep(self.poll_interval).await;
        }
        Err(PageError::Timeout(key.to_string()))
    }

    /// Single store read without waiting.
    pub async fn cached(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.store.get(key).await
    }
}
