//! Wall clock backed by the tokio timer.

use std::time::Duration;

use async_trait::async_trait;
use fluorite_core::ports::Clock;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
