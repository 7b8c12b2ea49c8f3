//! Feed source trait for fetching upstream version listings

#[cfg(test)]
use mockall::automock;

use crate::feed::error::FeedError;
use crate::feed::types::FeedPage;

/// Trait for fetching one page of a package's version listing from the
/// upstream feed.
///
/// Implementations must not retry on their own: a non-success upstream
/// response or an empty result set is reported as a [`FeedError`] and the
/// caller decides what to do with it.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches the page of versions for `id` starting at offset `skip`.
    ///
    /// # Returns
    /// * `Ok(FeedPage)` - Parsed records plus a continuation pointer when the
    ///   feed has more results beyond this page
    /// * `Err(FeedError)` - Network failure, non-success status, empty result
    ///   set, or unparseable payload
    async fn fetch_page(&self, id: &str, skip: u64) -> Result<FeedPage, FeedError>;
}
