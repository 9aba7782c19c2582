// In-memory JobStore implementation
//
// Records are retained for the lifetime of the process; there is no eviction.

use crate::domain::{Batch, BatchId, DomainError, Job, JobId, Status};
use crate::error::{AppError, Result};
use crate::port::JobStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Default)]
struct Tables {
    jobs: HashMap<JobId, Job>,
    batches: HashMap<BatchId, Batch>,
}

/// Process-local store guarded by a single lock.
///
/// Every method takes the lock once and never awaits while holding it, so
/// readers always see whole records.
#[derive(Default)]
pub struct InMemoryJobStore {
    tables: RwLock<Tables>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another thread panicked mid-call; every
    // write below is a single insert, so the tables are still whole.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert_job(&self, job: Job, batches: Vec<Batch>) -> Result<()> {
        if job.batch_ids.is_empty() {
            return Err(AppError::Validation(format!(
                "Job {} has no batches",
                job.id
            )));
        }

        let mut by_id: HashMap<BatchId, Batch> =
            batches.into_iter().map(|b| (b.id.clone(), b)).collect();
        if by_id.len() != job.batch_ids.len() {
            return Err(AppError::InvalidState(format!(
                "Job {} references {} batches but {} were supplied",
                job.id,
                job.batch_ids.len(),
                by_id.len()
            )));
        }
        for batch_id in &job.batch_ids {
            match by_id.get(batch_id) {
                Some(batch) if batch.job_id == job.id => {}
                Some(_) => {
                    return Err(AppError::InvalidState(format!(
                        "Batch {} belongs to another job",
                        batch_id
                    )))
                }
                None => return Err(DomainError::BatchNotFound(batch_id.clone()).into()),
            }
        }

        let mut tables = self.write();
        if tables.jobs.contains_key(&job.id) {
            return Err(AppError::Conflict(format!("Job {} already exists", job.id)));
        }
        if let Some(dup) = job.batch_ids.iter().find(|id| tables.batches.contains_key(*id)) {
            return Err(AppError::Conflict(format!("Batch {} already exists", dup)));
        }

        // Batches first: a job is never visible without its batches
        for batch_id in &job.batch_ids {
            if let Some(batch) = by_id.remove(batch_id) {
                tables.batches.insert(batch_id.clone(), batch);
            }
        }
        debug!(job_id = %job.id, batches = job.batch_ids.len(), "Job stored");
        tables.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn find_job(&self, id: &JobId) -> Result<Option<Job>> {
        Ok(self.read().jobs.get(id).cloned())
    }

    async fn find_batch(&self, id: &BatchId) -> Result<Option<Batch>> {
        Ok(self.read().batches.get(id).cloned())
    }

    async fn find_batches_for_job(&self, job_id: &JobId) -> Result<Vec<Batch>> {
        let tables = self.read();
        let job = tables
            .jobs
            .get(job_id)
            .ok_or_else(|| DomainError::JobNotFound(job_id.clone()))?;

        job.batch_ids
            .iter()
            .map(|id| {
                tables
                    .batches
                    .get(id)
                    .cloned()
                    .ok_or_else(|| DomainError::BatchNotFound(id.clone()).into())
            })
            .collect()
    }

    async fn update_batch(&self, batch: &Batch) -> Result<()> {
        let mut tables = self.write();
        match tables.batches.get_mut(&batch.id) {
            Some(stored) => {
                *stored = batch.clone();
                Ok(())
            }
            None => Err(DomainError::BatchNotFound(batch.id.clone()).into()),
        }
    }

    async fn update_job_status(&self, job_id: &JobId, status: Status) -> Result<()> {
        let mut tables = self.write();
        match tables.jobs.get_mut(job_id) {
            Some(job) => {
                job.status = status;
                Ok(())
            }
            None => Err(DomainError::JobNotFound(job_id.clone()).into()),
        }
    }

    async fn count_jobs_by_status(&self, status: Status) -> Result<usize> {
        Ok(self.read().jobs.values().filter(|j| j.status == status).count())
    }

    async fn count_batches_by_status(&self, status: Status) -> Result<usize> {
        Ok(self
            .read()
            .batches
            .values()
            .filter(|b| b.status == status)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    fn job_with_batches(job_id: &str, groups: &[&[u64]]) -> (Job, Vec<Batch>) {
        let batches: Vec<Batch> = groups
            .iter()
            .enumerate()
            .map(|(i, items)| Batch::new(format!("{}-b{}", job_id, i), job_id, items.to_vec()))
            .collect();
        let job = Job::new(
            job_id,
            1000,
            Priority::Low,
            batches.iter().map(|b| b.id.clone()).collect(),
        );
        (job, batches)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryJobStore::new();
        let (job, batches) = job_with_batches("j1", &[&[1, 2, 3], &[4]]);
        store.insert_job(job, batches).await.unwrap();

        let job = store.find_job(&"j1".to_string()).await.unwrap().unwrap();
        assert_eq!(job.batch_ids, vec!["j1-b0", "j1-b1"]);

        let batches = store.find_batches_for_job(&job.id).await.unwrap();
        assert_eq!(batches[0].item_ids, vec![1, 2, 3]);
        assert_eq!(batches[1].item_ids, vec![4]);
        assert!(batches.iter().all(|b| b.status == Status::YetToStart));
    }

    #[tokio::test]
    async fn test_insert_rejects_missing_batch() {
        let store = InMemoryJobStore::new();
        let (job, mut batches) = job_with_batches("j2", &[&[1], &[2]]);
        batches.pop();

        assert!(store.insert_job(job, batches).await.is_err());
        assert!(store.find_job(&"j2".to_string()).await.unwrap().is_none());
        assert!(store
            .find_batch(&"j2-b0".to_string())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_job() {
        let store = InMemoryJobStore::new();
        let (job, batches) = job_with_batches("j3", &[&[1]]);
        store.insert_job(job.clone(), batches.clone()).await.unwrap();

        let err = store.insert_job(job, batches).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_batch_and_counts() {
        let store = InMemoryJobStore::new();
        let (job, batches) = job_with_batches("j4", &[&[1], &[2]]);
        store.insert_job(job, batches).await.unwrap();

        let mut batch = store.find_batch(&"j4-b0".to_string()).await.unwrap().unwrap();
        batch.trigger(2000).unwrap();
        store.update_batch(&batch).await.unwrap();
        store
            .update_job_status(&"j4".to_string(), Status::Triggered)
            .await
            .unwrap();

        assert_eq!(store.count_batches_by_status(Status::Triggered).await.unwrap(), 1);
        assert_eq!(store.count_batches_by_status(Status::YetToStart).await.unwrap(), 1);
        assert_eq!(store.count_jobs_by_status(Status::Triggered).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_records() {
        let store = InMemoryJobStore::new();
        let missing = Batch::new("nope", "nobody", vec![1]);

        assert!(store.update_batch(&missing).await.is_err());
        assert!(store
            .update_job_status(&"nobody".to_string(), Status::Completed)
            .await
            .is_err());
        assert!(store
            .find_batches_for_job(&"nobody".to_string())
            .await
            .is_err());
    }
}
