// Status Aggregator - rolls batch statuses up into a job status

use crate::domain::{JobId, Status};
use crate::error::Result;
use crate::port::JobStore;
use std::sync::Arc;
use tracing::debug;

/// Derive a job status from its batch statuses.
///
/// Rules, evaluated in order:
/// 1. every batch `yet_to_start` -> `yet_to_start`
/// 2. any batch `triggered` -> `triggered`
/// 3. otherwise -> `completed`
///
/// Rule 3 also covers a mix of `completed` and `yet_to_start` batches with
/// nothing currently `triggered` (a job between two dispatches). Such a job
/// reports `completed` even though some of its batches have not started.
pub fn aggregate<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    let mut all_pending = true;
    let mut any_triggered = false;
    for status in statuses {
        match status {
            Status::YetToStart => {}
            Status::Triggered => {
                all_pending = false;
                any_triggered = true;
            }
            Status::Completed => all_pending = false,
        }
    }

    if all_pending {
        Status::YetToStart
    } else if any_triggered {
        Status::Triggered
    } else {
        Status::Completed
    }
}

/// Recomputes and stores job statuses
pub struct StatusAggregator {
    store: Arc<dyn JobStore>,
}

impl StatusAggregator {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Re-derive the job's status from the current batch statuses and store it
    pub async fn recompute(&self, job_id: &JobId) -> Result<Status> {
        let batches = self.store.find_batches_for_job(job_id).await?;
        let status = aggregate(batches.iter().map(|b| b.status));
        self.store.update_job_status(job_id, status).await?;

        debug!(job_id = %job_id, status = %status, "Job status recomputed");
        Ok(status)
    }
}
