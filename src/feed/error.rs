use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("no packages found for '{0}'")]
    NoPackages(String),

    #[error("invalid feed response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("readahead fetch failed: {0}")]
    Fetch(#[from] FeedError),

    #[error("invalid continuation pointer: {0}")]
    InvalidContinuation(String),
}
