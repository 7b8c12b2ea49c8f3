//! Registration synthesis orchestration
//!
//! Ties the layers together per request: fetch the first upstream page,
//! partition it into an index, publish multi-leaf pages as standalone
//! documents, and - when the feed has more pages - hand a detached readahead
//! task to the spawner so the "older" page materializes in the store behind
//! the response.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::config::BridgeConfig;
use crate::feed::readahead::aggregate_remaining;
use crate::feed::source::FeedSource;
use crate::feed::types::Continuation;
use crate::registration::assembler::{assemble, assemble_older_page};
use crate::registration::error::{PageError, SynthesisError};
use crate::registration::types::{RegistrationIndex, page_url};
use crate::service::publisher::DocumentPublisher;
use crate::service::spawn::Spawn;
use crate::store::DocumentStore;

pub struct RegistrationService {
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn DocumentStore>,
    spawner: Arc<dyn Spawn>,
    publisher: DocumentPublisher,
    readahead_concurrency: usize,
    older_page_ttl: Duration,
}

impl RegistrationService {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        store: Arc<dyn DocumentStore>,
        spawner: Arc<dyn Spawn>,
        config: &BridgeConfig,
    ) -> Self {
        let publisher = DocumentPublisher::new(
            Arc::clone(&store),
            Duration::from_secs(config.page_cache_ttl_secs),
            config.page_poll_retries,
            Duration::from_millis(config.page_poll_interval_ms),
        );
        Self {
            feed,
            store,
            spawner,
            publisher,
            readahead_concurrency: config.readahead_concurrency,
            older_page_ttl: Duration::from_secs(config.older_page_cache_ttl_secs),
        }
    }

    /// Synthesizes the registration index for `id`, with multi-leaf pages
    /// already stubbed out to the store. Returns without waiting for the
    /// detached "older" population to finish.
    pub async fn registration_index(
        &self,
        base: &Url,
        id: &str,
    ) -> Result<RegistrationIndex, SynthesisError> {
        debug!("registration index query for {id}");

        let first_page = self.feed.fetch_page(id, 0).await?;
        let has_more = first_page.continuation.is_some();
        let index = assemble(base, id, first_page.records, has_more)?;

        // Remaining upstream pages are processed in the background so the
        // response is not blocked on them
        if let Some(continuation) = first_page.continuation {
            self.spawn_older_population(base.clone(), id.to_string(), continuation);
        }

        // The caller gets the stub form: minimal, most-requested data inline,
        // the rest behind store lookups
        Ok(self.publisher.stub_and_publish(index).await?)
    }

    /// Serves a named page ("latest", "prerelease", "recent", "older") as a
    /// standalone document, synthesizing the index first on a cold deep link.
    pub async fn registration_page(
        &self,
        base: &Url,
        id: &str,
        name: &str,
    ) -> Result<Value, PageError> {
        let key = page_url(base, id, name);
        if let Some(document) = self.publisher.cached(key.as_str()).await? {
            return Ok(document);
        }

        debug!("page {name} for {id} not cached, synthesizing index");
        let index = self.registration_index(base, id).await?;

        let Some(page) = index.items.iter().find(|page| page.name() == Some(name)) else {
            return Err(PageError::NotFound(name.to_string()));
        };

        if page.items.is_some() {
            // Inlined singleton: serve it straight out of the index
            return serde_json::to_value(page)
                .map_err(|e| PageError::Store(crate::store::StoreError::Serialize(e)));
        }

        if page.count > 0 {
            // Stubbed during stub_and_publish, so the store has it now
            if let Some(document) = self.publisher.cached(key.as_str()).await? {
                return Ok(document);
            }
        }

        // The "older" page: populated by the detached task, so wait for it
        // within the bounded poll window
        self.publisher.await_page(key.as_str()).await
    }

    fn spawn_older_population(&self, base: Url, id: String, continuation: Continuation) {
        let feed = Arc::clone(&self.feed);
        let store = Arc::clone(&self.store);
        let concurrency = self.readahead_concurrency;
        let ttl = self.older_page_ttl;

        self.spawner.spawn(Box::pin(async move {
            let records =
                match aggregate_remaining(feed.as_ref(), &id, &continuation, concurrency).await {
                    Ok(records) => records,
                    Err(e) => {
                        // Accepted degraded state: the stub stays
                        // unmaterialized until a later request re-triggers
                        // synthesis
                        error!("readahead aggregation for {id} failed: {e}");
                        return;
                    }
                };
            debug!("found {} remaining records for {id}", records.len());

            let page = match assemble_older_page(&base, &id, &records) {
                Ok(page) => page,
                Err(e) => {
                    error!("failed to assemble older page for {id}: {e}");
                    return;
                }
            };

            let document = match serde_json::to_value(&page) {
                Ok(document) => document,
                Err(e) => {
                    error!("failed to serialize older page for {id}: {e}");
                    return;
                }
            };
            if let Err(e) = store.put(page.id.as_str(), document, ttl).await {
                error!("failed to cache older page for {id}: {e}");
            }
        }));
    }
}
