use std::sync::Arc;
use std::time::Duration;
use crate::interfaces::clock::Clock;
use crate::types::timestamp::Timestamp;

/// Spaces successive requests to one adapter by at least `interval`.
///
/// Waiting happens before a request is issued. Nothing here retries.
pub struct RequestPacer {
    interval: Duration,
    clock: Arc<dyn Clock>,
    last_request: Option<Timestamp>,
}

impl RequestPacer {
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        RequestPacer {
            interval,
            clock,
            last_request: None,
        }
    }

    /// Time still to wait before the next request may go out.
    pub fn remaining(&self) -> Duration {
        match self.last_request {
            Some(last) => self.interval.saturating_sub(self.clock.now() - last),
            None => Duration::ZERO,
        }
    }

    pub async fn wait_turn(&mut self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            tracing::trace!(wait_ms = remaining.as_millis() as u64, "Pacing request");
            self.clock.sleep(remaining).await;
        }
        self.last_request = Some(self.clock.now());
    }
}
