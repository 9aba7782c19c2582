// Batch Domain Model

use super::error::{DomainError, Result};
use super::job::JobId;
use super::status::Status;
use serde::{Deserialize, Serialize};

/// Batch ID (UUID v4)
pub type BatchId = String;

/// Item identifier submitted by clients
pub type ItemId = u64;

/// Smallest accepted item id
pub const MIN_ITEM_ID: ItemId = 1;

/// Largest accepted item id
pub const MAX_ITEM_ID: ItemId = 1_000_000_007;

/// Maximum number of items grouped into one batch
pub const BATCH_SIZE: usize = 3;

/// A group of at most [`BATCH_SIZE`] items dispatched together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub job_id: JobId,
    pub item_ids: Vec<ItemId>,
    pub status: Status,

    pub triggered_at: Option<i64>, // epoch ms
    pub completed_at: Option<i64>, // epoch ms
}

impl Batch {
    /// Create a new batch in `yet_to_start`
    pub fn new(id: impl Into<String>, job_id: impl Into<String>, item_ids: Vec<ItemId>) -> Self {
        Self {
            id: id.into(),
            job_id: job_id.into(),
            item_ids,
            status: Status::YetToStart,
            triggered_at: None,
            completed_at: None,
        }
    }

    /// Transition to `triggered` with explicit timestamp
    pub fn trigger(&mut self, now_millis: i64) -> Result<()> {
        if self.status != Status::YetToStart {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: Status::Triggered.to_string(),
            });
        }
        self.status = Status::Triggered;
        self.triggered_at = Some(now_millis);
        Ok(())
    }

    /// Transition to `completed` with explicit timestamp
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        if self.status != Status::Triggered {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: Status::Completed.to_string(),
            });
        }
        self.status = Status::Completed;
        self.completed_at = Some(now_millis);
        Ok(())
    }
}

/// Split item ids into consecutive groups of at most `size` items.
///
/// Order is preserved both across and within groups.
pub fn partition_items(item_ids: &[ItemId], size: usize) -> Vec<Vec<ItemId>> {
    item_ids
        .chunks(size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_lifecycle() {
        let mut batch = Batch::new("b-1", "j-1", vec![1, 2, 3]);
        assert_eq!(batch.status, Status::YetToStart);

        batch.trigger(1000).unwrap();
        assert_eq!(batch.status, Status::Triggered);
        assert_eq!(batch.triggered_at, Some(1000));

        batch.complete(2000).unwrap();
        assert_eq!(batch.status, Status::Completed);
        assert_eq!(batch.completed_at, Some(2000));
    }

    #[test]
    fn test_batch_status_never_reverts() {
        let mut batch = Batch::new("b-2", "j-1", vec![4]);

        // Cannot complete without triggering first
        assert!(batch.complete(1000).is_err());

        batch.trigger(1000).unwrap();
        assert!(batch.trigger(1500).is_err());

        batch.complete(2000).unwrap();
        assert!(batch.trigger(3000).is_err());
        assert!(batch.complete(3000).is_err());
        assert_eq!(batch.status, Status::Completed);
        assert_eq!(batch.completed_at, Some(2000));
    }

    #[test]
    fn test_partition_items_groups_of_three() {
        let groups = partition_items(&[1, 2, 3, 4], BATCH_SIZE);
        assert_eq!(groups, vec![vec![1, 2, 3], vec![4]]);

        let groups = partition_items(&[7, 8, 9, 10, 11, 12], BATCH_SIZE);
        assert_eq!(groups, vec![vec![7, 8, 9], vec![10, 11, 12]]);

        assert!(partition_items(&[], BATCH_SIZE).is_empty());
    }
}
