//! NuGet v2 feed client implementation

use tracing::{debug, warn};

use crate::config::DEFAULT_UPSTREAM_URL;
use crate::feed::error::FeedError;
use crate::feed::parser::parse_feed;
use crate::feed::source::FeedSource;
use crate::feed::types::FeedPage;

/// Fields requested from the upstream feed for each entry
const SELECT_FIELDS: &str = "GUID,Version,NormalizedVersion,Dependencies,Tags,IsLatestVersion,IsAbsoluteLatestVersion";

/// Upstream ordering: latest flags first, then newest by creation time, so the
/// first page always carries the versions clients ask for most.
const ORDER_BY: &str = "IsLatestVersion desc,IsAbsoluteLatestVersion desc,Created desc";

/// Feed client for a NuGet v2 endpoint such as the PowerShell Gallery
pub struct GalleryFeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl GalleryFeedClient {
    /// Creates a new client against a custom v2 endpoint
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("gallery-bridge")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn query_url(&self, id: &str, skip: u64) -> String {
        let mut url = format!(
            "{}/FindPackagesById()?id='{}'&semVerLevel=2.0.0&$orderby={}&$select={}",
            self.base_url, id, ORDER_BY, SELECT_FIELDS
        );
        if skip > 0 {
            url.push_str(&format!("&$skip={skip}"));
        }
        url
    }
}

impl Default for GalleryFeedClient {
    fn default() -> Self {
        Self::new(DEFAULT_UPSTREAM_URL)
    }
}

#[async_trait::async_trait]
impl FeedSource for GalleryFeedClient {
    async fn fetch_page(&self, id: &str, skip: u64) -> Result<FeedPage, FeedError> {
        let url = self.query_url(id, skip);
        debug!("origin request: {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/atom+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("upstream feed returned status {status}: {url}");
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let page = parse_feed(&body)?;

        if page.records.is_empty() {
            return Err(FeedError::NoPackages(id.to_string()));
        }

        debug!("{id}: {} records at skip {skip}", page.records.len());
        Ok(page)
    }
}
