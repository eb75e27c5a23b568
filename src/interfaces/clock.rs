use async_trait::async_trait;
use std::time::Duration;
use crate::types::timestamp::Timestamp;

/// Time source for pacing and collection windows.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
    async fn sleep(&self, duration: Duration);
}
