//! Request-level orchestration
//!
//! - [`synthesizer`]: `RegistrationService`, the per-request pipeline from
//!   upstream fetch to stubbed index
//! - [`publisher`]: stub/full document discipline and the bounded
//!   wait-for-population read
//! - [`spawn`]: injected capability for detached background tasks

pub mod publisher;
pub mod spawn;
pub mod synthesizer;
