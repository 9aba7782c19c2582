// Item Processor Port
// Abstraction for the per-item side effect performed during a dispatch

use crate::domain::ItemId;
use async_trait::async_trait;
use thiserror::Error;

/// Result of processing one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item_id: ItemId,
    pub duration_ms: i64,
    pub detail: Option<String>,
}

/// Item processing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Remote returned status {0}")]
    Status(u16),

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("Processor panicked: {0}")]
    Panicked(String),
}

/// Item Processor trait
///
/// Implementations:
/// - SimulatedFetchProcessor: fixed latency, always succeeds
/// - HttpFetchProcessor: remote GET per item
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    /// Perform the side effect for one item.
    ///
    /// Called at most once per item; failures are not retried.
    async fn process(&self, item_id: ItemId) -> Result<ItemOutcome, ItemError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    /// Mock processor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Fail for the listed ids, succeed otherwise
        FailFor(HashSet<ItemId>),
        /// Panic for the listed ids (for panic isolation testing)
        PanicFor(HashSet<ItemId>),
    }

    /// One recorded call
    #[derive(Debug, Clone)]
    pub struct ProcessedCall {
        pub item_id: ItemId,
        pub started: Instant,
    }

    /// Mock Item Processor for testing
    pub struct MockItemProcessor {
        behavior: Arc<Mutex<MockBehavior>>,
        latency: Duration,
        calls: Arc<Mutex<Vec<ProcessedCall>>>,
    }

    impl MockItemProcessor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                latency: Duration::ZERO,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn failing_for(ids: impl IntoIterator<Item = ItemId>) -> Self {
            Self::new(MockBehavior::FailFor(ids.into_iter().collect()))
        }

        pub fn panicking_for(ids: impl IntoIterator<Item = ItemId>) -> Self {
            Self::new(MockBehavior::PanicFor(ids.into_iter().collect()))
        }

        /// Simulated per-item latency (runtime clock)
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn calls(&self) -> Vec<ProcessedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn processed_ids(&self) -> Vec<ItemId> {
            self.calls().into_iter().map(|c| c.item_id).collect()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ItemProcessor for MockItemProcessor {
        async fn process(&self, item_id: ItemId) -> Result<ItemOutcome, ItemError> {
            self.calls.lock().unwrap().push(ProcessedCall {
                item_id,
                started: Instant::now(),
            });

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::FailFor(ids) if ids.contains(&item_id) => {
                    Err(ItemError::Request(format!("mock failure for {}", item_id)))
                }
                MockBehavior::PanicFor(ids) if ids.contains(&item_id) => {
                    panic!("mock panic for {}", item_id);
                }
                _ => Ok(ItemOutcome {
                    item_id,
                    duration_ms: self.latency.as_millis() as i64,
                    detail: None,
                }),
            }
        }
    }
}
