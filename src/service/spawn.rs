//! Detached task spawning
//!
//! Readahead aggregation runs after the response has already been returned,
//! with no caller-visible handle. The capability to spawn such a task is
//! injected rather than assumed, so hosts (and tests) control where detached
//! work actually runs.

use futures::future::BoxFuture;

/// Trait for spawning a detached background task.
pub trait Spawn: Send + Sync {
    /// Runs `task` outside the current request/response cycle. No completion
    /// guarantee is given and no cancellation is performed.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Spawns detached tasks onto the ambient tokio runtime.
pub struct TokioSpawn;

impl Spawn for TokioSpawn {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        tokio::spawn(task);
    }
}
