// Status Query Use Case

use crate::application::dispatcher::Dispatcher;
use crate::application::scheduler::PriorityScheduler;
use crate::domain::{BatchId, ItemId, JobId, Priority, Status};
use crate::error::{AppError, Result};
use crate::port::JobStore;
use serde::Serialize;

/// One batch as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub batch_id: BatchId,
    pub item_ids: Vec<ItemId>,
    pub status: Status,
}

/// A job with its aggregated status and batches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    pub job_id: JobId,
    pub status: Status,
    pub priority: Priority,
    pub created_at: i64,
    pub batches: Vec<BatchReport>,
}

/// Engine-wide counters
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub jobs_yet_to_start: usize,
    pub jobs_triggered: usize,
    pub jobs_completed: usize,
    pub batches_yet_to_start: usize,
    pub batches_triggered: usize,
    pub batches_completed: usize,
    pub pending_high: usize,
    pub pending_medium: usize,
    pub pending_low: usize,
    pub dispatcher_running: bool,
    pub batches_dispatched: u64,
    pub item_failures: u64,
    pub uptime_seconds: u64,
}

/// Look up one job
pub async fn job_report(store: &dyn JobStore, job_id: &JobId) -> Result<JobReport> {
    let job = store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    let batches = store
        .find_batches_for_job(job_id)
        .await?
        .into_iter()
        .map(|b| BatchReport {
            batch_id: b.id,
            item_ids: b.item_ids,
            status: b.status,
        })
        .collect();

    Ok(JobReport {
        job_id: job.id,
        status: job.status,
        priority: job.priority,
        created_at: job.created_at,
        batches,
    })
}

/// Collect store, queue and dispatcher counters
pub async fn engine_stats(
    store: &dyn JobStore,
    scheduler: &PriorityScheduler,
    dispatcher: &Dispatcher,
    uptime_seconds: u64,
) -> Result<EngineStats> {
    let pending = scheduler.pending_by_priority();
    let pending_for = |p: Priority| {
        pending
            .iter()
            .find(|(priority, _)| *priority == p)
            .map_or(0, |(_, n)| *n)
    };
    let dispatch = dispatcher.stats();

    Ok(EngineStats {
        jobs_yet_to_start: store.count_jobs_by_status(Status::YetToStart).await?,
        jobs_triggered: store.count_jobs_by_status(Status::Triggered).await?,
        jobs_completed: store.count_jobs_by_status(Status::Completed).await?,
        batches_yet_to_start: store.count_batches_by_status(Status::YetToStart).await?,
        batches_triggered: store.count_batches_by_status(Status::Triggered).await?,
        batches_completed: store.count_batches_by_status(Status::Completed).await?,
        pending_high: pending_for(Priority::High),
        pending_medium: pending_for(Priority::Medium),
        pending_low: pending_for(Priority::Low),
        dispatcher_running: dispatch.running,
        batches_dispatched: dispatch.batches_dispatched,
        item_failures: dispatch.item_failures,
        uptime_seconds,
    })
}
