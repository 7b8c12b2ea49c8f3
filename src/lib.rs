//! gallery-bridge: serves NuGet v3 registration documents synthesized on the
//! fly from a legacy NuGet v2 feed (the PowerShell Gallery, by default).
//!
//! A request for a package's version index fetches the first upstream feed
//! page, partitions the records into a small set of logical pages, publishes
//! large pages to a TTL document store, and - when the feed has more pages -
//! pulls in the remainder with a bounded-concurrency readahead running behind
//! the response.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   records    ┌─────────────┐   documents   ┌────────┐
//! │   feed   │─────────────▶│ registration│──────────────▶│ store  │
//! │ (v2 XML) │  readahead   │ (v3 tree)   │  stub/publish │ (TTL)  │
//! └──────────┘              └─────────────┘               └────────┘
//!       ▲                          ▲                          ▲
//!       └──────────────────────────┴──────────────────────────┘
//!                         service (orchestration)
//!                                  ▲
//!                            server (axum)
//! ```

pub mod config;
pub mod feed;
pub mod registration;
pub mod server;
pub mod service;
pub mod store;
