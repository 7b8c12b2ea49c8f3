//! Bounded-concurrency readahead across upstream pagination
//!
//! When the first feed page carries a continuation, the remaining pages are
//! pulled in eagerly: a fixed-size window of in-flight fetches at consecutive
//! `$skip` offsets, with completions consumed in issue order so the aggregated
//! records are deterministic regardless of network timing. Aggregation is
//! all-or-nothing: any fetch failure aborts it.

use futures::stream::{FuturesOrdered, StreamExt};
use tracing::debug;

use crate::feed::error::AggregationError;
use crate::feed::source::FeedSource;
use crate::feed::types::{Continuation, VersionRecord};

/// Fetches every remaining upstream page after `continuation` and returns the
/// reassembled records in page order.
///
/// At most `concurrency` fetches are outstanding at once. Issuing stops at the
/// first page with no continuation pointer; fetches already in flight beyond
/// that point are discarded unread, since that page's missing pointer already
/// signaled completion.
pub async fn aggregate_remaining(
    source: &dyn FeedSource,
    id: &str,
    continuation: &Continuation,
    concurrency: usize,
) -> Result<Vec<VersionRecord>, AggregationError> {
    let stride = continuation.stride().ok_or_else(|| {
        AggregationError::InvalidContinuation(format!(
            "no usable $skip parameter in {}",
            continuation.url
        ))
    })?;
    let concurrency = concurrency.max(1);

    let mut window = FuturesOrdered::new();
    let mut next_skip = stride;

    // Fill the window up front, then keep it full with one new fetch per
    // completion until a page with no continuation is seen.
    while window.len() < concurrency {
        debug!("{id}: readahead fetch at skip {next_skip}");
        window.push_back(source.fetch_page(id, next_skip));
        next_skip += stride;
    }

    let mut records = Vec::new();
    while let Some(page) = window.next().await {
        let page = page?;
        let has_more = page.continuation.is_some();
        records.extend(page.records);

        if !has_more {
            break;
        }
        debug!("{id}: readahead fetch at skip {next_skip}");
        window.push_back(source.fetch_page(id, next_skip));
        next_skip += stride;
    }

    debug!("{id}: readahead aggregated {} records", records.len());
    Ok(records)
}
