//! Upstream NuGet v2 feed layer
//!
//! Everything that talks to (or models) the legacy feed lives here:
//!
//! - [`source`]: the `FeedSource` trait, the seam the rest of the crate
//!   fetches through
//! - [`client`]: reqwest-based `FindPackagesById()` client
//! - [`parser`]: Atom/OData XML to version records and continuation pointers
//! - [`readahead`]: bounded-concurrency aggregation of the remaining pages
//! - [`types`]: `VersionRecord`, `FeedPage`, `Continuation`
//! - [`error`]: feed and aggregation error types

pub mod client;
pub mod error;
pub mod parser;
pub mod readahead;
pub mod source;
pub mod types;
