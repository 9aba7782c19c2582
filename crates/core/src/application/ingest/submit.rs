// Submit Use Case

use crate::application::dispatcher::Dispatcher;
use crate::application::scheduler::PriorityScheduler;
use crate::domain::{
    partition_items, Batch, ItemId, Job, JobId, Priority, Status, BATCH_SIZE, MAX_ITEM_ID,
    MIN_ITEM_ID,
};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, JobStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Submission request as received at the boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub ids: Vec<i64>,

    #[serde(default)]
    pub priority: Option<String>,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIngest {
    pub ids: Vec<ItemId>,
    pub priority: Priority,
}

/// Result of a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub job_id: JobId,
    pub status: Status,
    pub batch_count: usize,
}

/// Validate shape and ranges before anything is created
pub fn validate_request(req: &IngestRequest) -> Result<ValidatedIngest> {
    if req.ids.is_empty() {
        return Err(AppError::Validation("ids must not be empty".to_string()));
    }

    let ids = req
        .ids
        .iter()
        .map(|&id| {
            u64::try_from(id)
                .ok()
                .filter(|id| (MIN_ITEM_ID..=MAX_ITEM_ID).contains(id))
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "id {} out of range [{}, {}]",
                        id, MIN_ITEM_ID, MAX_ITEM_ID
                    ))
                })
        })
        .collect::<Result<Vec<ItemId>>>()?;

    let priority = match req.priority.as_deref() {
        None => Priority::default(),
        Some(raw) => raw
            .parse::<Priority>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
    };

    Ok(ValidatedIngest { ids, priority })
}

/// Execute submit use case
///
/// # Arguments
///
/// * `store` - Job store (job and batches are inserted atomically)
/// * `scheduler` - Pending queue the batches are added to
/// * `dispatcher` - Started if it is not already running
/// * `id_provider` - ID generator (injected for determinism)
/// * `created_at` - Submission timestamp, never earlier than any previous one
/// * `req` - Submission request
pub async fn execute(
    store: &dyn JobStore,
    scheduler: &PriorityScheduler,
    dispatcher: &Arc<Dispatcher>,
    id_provider: &dyn IdProvider,
    created_at: i64,
    req: IngestRequest,
) -> Result<IngestReceipt> {
    let ValidatedIngest { ids, priority } = validate_request(&req)?;

    let job_id = id_provider.generate_id();

    let batches: Vec<Batch> = partition_items(&ids, BATCH_SIZE)
        .into_iter()
        .map(|items| Batch::new(id_provider.generate_id(), job_id.clone(), items))
        .collect();
    let batch_ids: Vec<_> = batches.iter().map(|b| b.id.clone()).collect();
    let job = Job::new(job_id.clone(), created_at, priority, batch_ids.clone());

    // Store before enqueue: the dispatcher must always find what it dequeues
    store.insert_job(job, batches).await?;
    for batch_id in &batch_ids {
        scheduler.enqueue(batch_id.clone(), priority, created_at);
    }

    let started = dispatcher.ensure_running();
    info!(
        job_id = %job_id,
        priority = %priority,
        items = ids.len(),
        batches = batch_ids.len(),
        dispatcher_started = started,
        "Job submitted"
    );

    Ok(IngestReceipt {
        job_id,
        status: Status::YetToStart,
        batch_count: batch_ids.len(),
    })
}
