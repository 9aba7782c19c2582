// Job Store Port (Interface)

use crate::domain::{Batch, BatchId, Job, JobId, Status};
use crate::error::Result;
use async_trait::async_trait;

/// Owner of every job and batch record.
///
/// Callers only ever receive clones; the store's copy is authoritative.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a job together with all of its batches.
    ///
    /// Either everything becomes visible or nothing does. Every id in
    /// `job.batch_ids` must have a matching entry in `batches`.
    async fn insert_job(&self, job: Job, batches: Vec<Batch>) -> Result<()>;

    /// Find job by ID
    async fn find_job(&self, id: &JobId) -> Result<Option<Job>>;

    /// Find batch by ID
    async fn find_batch(&self, id: &BatchId) -> Result<Option<Batch>>;

    /// Batches of a job, in the job's batch order
    async fn find_batches_for_job(&self, job_id: &JobId) -> Result<Vec<Batch>>;

    /// Replace a stored batch
    async fn update_batch(&self, batch: &Batch) -> Result<()>;

    /// Overwrite the derived status of a job
    async fn update_job_status(&self, job_id: &JobId, status: Status) -> Result<()>;

    /// Count jobs by status
    async fn count_jobs_by_status(&self, status: Status) -> Result<usize>;

    /// Count batches by status
    async fn count_batches_by_status(&self, status: Status) -> Result<usize>;
}
