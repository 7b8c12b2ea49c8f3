use thiserror::Error;

use crate::feed::error::FeedError;
use crate::store::StoreError;

/// An upstream version string that cannot be coerced into a semantic version.
/// Fatal to the whole synthesis: version comparability is a hard invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed version '{raw}': {reason}")]
pub struct MalformedVersion {
    pub raw: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Malformed(#[from] MalformedVersion),

    /// Upstream failures propagate unchanged; the caller decides retry policy
    #[error(transparent)]
    Upstream(#[from] FeedError),

    /// Empty input with no continuation: the upstream query shape guarantees
    /// at least one latest-flagged record, so this signals a broken invariant
    /// rather than a missing package
    #[error("no versions found for '{0}'")]
    NoVersionsFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("registration page '{0}' does not exist")]
    NotFound(String),

    /// The bounded wait for background population ran out. Retryable by the
    /// client; the bridge never re-runs aggregation for it.
    #[error("timed out waiting for page '{0}' to be populated")]
    Timeout(String),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
