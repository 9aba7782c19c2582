// Simulated fetch: fixed latency, always succeeds
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use batchpace_core::domain::ItemId;
use batchpace_core::port::{ItemError, ItemOutcome, ItemProcessor};

/// Default latency of one simulated remote call (1s)
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

/// Stand-in for the remote operation.
///
/// Every call waits `latency` on the runtime clock and then succeeds.
pub struct SimulatedFetchProcessor {
    latency: Duration,
}

impl SimulatedFetchProcessor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedFetchProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

#[async_trait]
impl ItemProcessor for SimulatedFetchProcessor {
    async fn process(&self, item_id: ItemId) -> Result<ItemOutcome, ItemError> {
        debug!(item_id = item_id, latency_ms = self.latency.as_millis() as u64, "Simulated fetch");
        tokio::time::sleep(self.latency).await;

        Ok(ItemOutcome {
            item_id,
            duration_ms: self.latency.as_millis() as i64,
            detail: Some(format!("fetched item {}", item_id)),
        })
    }
}
