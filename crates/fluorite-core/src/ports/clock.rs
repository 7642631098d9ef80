//! Clock port used by retry loops.

use std::time::Duration;

use async_trait::async_trait;

/// Source of delays.
///
/// Retry loops sleep through this trait so tests can run a full backoff
/// schedule instantly and assert on the requested delays.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}
