use serde::Deserialize;

// =============================================================================
// Upstream and cache constants
// =============================================================================

/// Default NuGet v2 feed the bridge reads from
pub const DEFAULT_UPSTREAM_URL: &str = "https://www.powershellgallery.com/api/v2";

/// Default listen address for the bridge server
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

/// Number of concurrent upstream fetches during readahead
pub const DEFAULT_READAHEAD_CONCURRENCY: usize = 5;

/// TTL for standalone page documents published to the store (24 hours)
pub const PAGE_CACHE_TTL_SECS: u64 = 86_400;

/// TTL for the background-populated "older" page (1 hour)
pub const OLDER_PAGE_CACHE_TTL_SECS: u64 = 3_600;

/// How many times a caller polls the store for a page that is still being
/// populated in the background
pub const PAGE_POLL_RETRIES: u32 = 5;

/// Delay between store polls in milliseconds (1 second)
pub const PAGE_POLL_INTERVAL_MS: u64 = 1_000;

/// Bridge configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Base URL of the NuGet v2 feed to bridge
    pub upstream_url: String,
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// External base URL used to build `@id` URIs. When unset, the request's
    /// Host header is used with an http scheme.
    pub public_base: Option<String>,
    /// Concurrent upstream fetches during readahead
    pub readahead_concurrency: usize,
    /// TTL in seconds for published standalone pages
    pub page_cache_ttl_secs: u64,
    /// TTL in seconds for the background-populated "older" page
    pub older_page_cache_ttl_secs: u64,
    /// Store poll attempts while waiting for background population
    pub page_poll_retries: u32,
    /// Delay between store polls in milliseconds
    pub page_poll_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            public_base: None,
            readahead_concurrency: DEFAULT_READAHEAD_CONCURRENCY,
            page_cache_ttl_secs: PAGE_CACHE_TTL_SECS,
            older_page_cache_ttl_secs: OLDER_PAGE_CACHE_TTL_SECS,
            page_poll_retries: PAGE_POLL_RETRIES,
            page_poll_interval_ms: PAGE_POLL_INTERVAL_MS,
        }
    }
}
