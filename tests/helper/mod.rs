//! Shared test utilities
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use url::Url;

use gallery_bridge::config::BridgeConfig;
use gallery_bridge::feed::error::FeedError;
use gallery_bridge::feed::source::FeedSource;
use gallery_bridge::feed::types::{Continuation, FeedPage, VersionRecord};
use gallery_bridge::service::spawn::Spawn;
use gallery_bridge::service::synthesizer::RegistrationService;
use gallery_bridge::store::DocumentStore;
use gallery_bridge::store::memory::MemoryStore;

pub fn record(id: &str, version: &str, latest: bool, prerelease: bool) -> VersionRecord {
    VersionRecord {
        id: id.to_string(),
        version: version.to_string(),
        content_url: format!("https://upstream.example/api/v2/package/{id}/{version}"),
        is_latest_stable: latest,
        is_latest_prerelease: prerelease,
        dependency_spec: None,
        tags: None,
        item_type: None,
    }
}

pub fn continuation(skip: u64) -> Continuation {
    Continuation::new(
        Url::parse(&format!("https://upstream.example/api/v2/feed?$skip={skip}")).unwrap(),
    )
}

/// Feed source scripted per skip offset
pub struct ScriptedFeed {
    pages: HashMap<u64, FeedPage>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn with_page(
        mut self,
        skip: u64,
        records: Vec<VersionRecord>,
        next_skip: Option<u64>,
    ) -> Self {
        self.pages.insert(
            skip,
            FeedPage {
                records,
                continuation: next_skip.map(continuation),
            },
        );
        self
    }
}

#[async_trait::async_trait]
impl FeedSource for ScriptedFeed {
    async fn fetch_page(&self, id: &str, skip: u64) -> Result<FeedPage, FeedError> {
        self.pages
            .get(&skip)
            .cloned()
            .ok_or_else(|| FeedError::NoPackages(id.to_string()))
    }
}

/// A spawner that records detached tasks instead of running them, so tests
/// decide when background population happens.
#[derive(Default)]
pub struct RecordedSpawn {
    tasks: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl RecordedSpawn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Drives every recorded task to completion.
    pub async fn run_all(&self) {
        let tasks: Vec<_> = self.tasks.lock().unwrap().drain(..).collect();
        for task in tasks {
            task.await;
        }
    }
}

impl Spawn for RecordedSpawn {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.tasks.lock().unwrap().push(task);
    }
}

pub fn base() -> Url {
    Url::parse("http://pwsh.gallery").unwrap()
}

/// Service over the given feed with an in-memory store and recorded spawner.
pub fn scripted_service(
    feed: ScriptedFeed,
) -> (RegistrationService, Arc<MemoryStore>, Arc<RecordedSpawn>) {
    let store = Arc::new(MemoryStore::new());
    let spawner = Arc::new(RecordedSpawn::new());
    let service = RegistrationService::new(
        Arc::new(feed),
        store.clone() as Arc<dyn DocumentStore>,
        spawner.clone(),
        &BridgeConfig::default(),
    );
    (service, store, spawner)
}
