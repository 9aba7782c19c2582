// Dispatcher - rate-limited batch dispatch loop

pub mod constants;
mod panic_guard;
mod shutdown;

use constants::RATE_LIMIT_INTERVAL;
pub use panic_guard::panic_message;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::aggregator::StatusAggregator;
use crate::application::scheduler::PriorityScheduler;
use crate::domain::{BatchId, DomainError, ItemId, JobId, Status};
use crate::error::Result;
use crate::port::{ItemError, ItemOutcome, ItemProcessor, JobStore, TimeProvider};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

/// Outcome of one dispatched batch
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub batch_id: BatchId,
    pub job_id: JobId,
    pub items: usize,
    pub failed_items: usize,
    pub job_status: Status,
}

/// Counters exposed for stats
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    pub running: bool,
    pub runs_started: u64,
    pub batches_dispatched: u64,
    pub item_failures: u64,
}

/// Single consumer of the [`PriorityScheduler`].
///
/// A run drains the queue one batch at a time and stops when the queue is
/// empty. At most one run is active; [`Dispatcher::ensure_running`] starts a
/// new one only if none is.
pub struct Dispatcher {
    store: Arc<dyn JobStore>,
    scheduler: Arc<PriorityScheduler>,
    processor: Arc<dyn ItemProcessor>,
    aggregator: StatusAggregator,
    time_provider: Arc<dyn TimeProvider>,
    shutdown: Option<ShutdownToken>,

    running: AtomicBool,
    // End of the previous dispatch (runtime clock)
    last_processed: Mutex<Option<Instant>>,

    runs_started: AtomicU64,
    batches_dispatched: AtomicU64,
    item_failures: AtomicU64,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn JobStore>,
        scheduler: Arc<PriorityScheduler>,
        processor: Arc<dyn ItemProcessor>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            aggregator: StatusAggregator::new(Arc::clone(&store)),
            store,
            scheduler,
            processor,
            time_provider,
            shutdown: None,
            running: AtomicBool::new(false),
            last_processed: Mutex::new(None),
            runs_started: AtomicU64::new(0),
            batches_dispatched: AtomicU64::new(0),
            item_failures: AtomicU64::new(0),
        }
    }

    /// Stop runs (and refuse new ones) once `token` fires
    pub fn with_shutdown(mut self, token: ShutdownToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Start a run unless one is already active.
    ///
    /// Returns true if this call started the run.
    pub fn ensure_running(self: &Arc<Self>) -> bool {
        if self.is_shutdown() {
            warn!("Dispatcher is shut down, not starting a run");
            return false;
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Dispatcher already running");
            return false;
        }

        self.runs_started.fetch_add(1, Ordering::Relaxed);
        info!(pending = self.scheduler.len(), "Dispatcher run started");
        tokio::spawn(Arc::clone(self).run());
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// When the previous dispatch finished, if any
    pub fn last_processed(&self) -> Option<Instant> {
        *self
            .last_processed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            running: self.is_running(),
            runs_started: self.runs_started.load(Ordering::Relaxed),
            batches_dispatched: self.batches_dispatched.load(Ordering::Relaxed),
            item_failures: self.item_failures.load(Ordering::Relaxed),
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|t| t.is_shutdown())
    }

    async fn run(self: Arc<Self>) {
        loop {
            if self.is_shutdown() {
                info!("Dispatcher shutting down");
                break;
            }

            if self.scheduler.is_empty() {
                if self.release_or_reclaim() {
                    continue;
                }
                info!("Queue drained, dispatcher run finished");
                return;
            }

            if !self.wait_for_slot().await {
                break;
            }

            match self.dispatch_next().await {
                Ok(Some(report)) => {
                    info!(
                        batch_id = %report.batch_id,
                        job_id = %report.job_id,
                        items = report.items,
                        failed_items = report.failed_items,
                        job_status = %report.job_status,
                        "Batch completed"
                    );
                }
                Ok(None) => continue,
                Err(e) => {
                    error!(error = %e, "Dispatch iteration failed");
                }
            }
            self.mark_processed();
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Clear the running flag after seeing an empty queue.
    ///
    /// A submission may have enqueued after that check and lost the flag to
    /// us; in that case the flag is taken back and this returns true.
    fn release_or_reclaim(&self) -> bool {
        self.running.store(false, Ordering::SeqCst);
        !self.scheduler.is_empty()
            && self
                .running
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
    }

    /// Sleep out the rest of the rate-limit interval.
    ///
    /// Returns false if shutdown arrived while waiting.
    async fn wait_for_slot(&self) -> bool {
        let wait = self.remaining_wait();
        if wait.is_zero() {
            return true;
        }

        debug!(wait_ms = wait.as_millis() as u64, "Rate limit: waiting before next dispatch");
        match self.shutdown.clone() {
            Some(mut token) => {
                tokio::select! {
                    _ = sleep(wait) => true,
                    _ = token.wait() => {
                        info!("Dispatcher interrupted during rate-limit wait");
                        false
                    }
                }
            }
            None => {
                sleep(wait).await;
                true
            }
        }
    }

    fn remaining_wait(&self) -> Duration {
        match self.last_processed() {
            Some(last) => RATE_LIMIT_INTERVAL.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    fn mark_processed(&self) {
        *self
            .last_processed
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    /// Dequeue one batch and drive it to `completed`
    async fn dispatch_next(&self) -> Result<Option<DispatchReport>> {
        let Some(entry) = self.scheduler.dequeue() else {
            return Ok(None);
        };

        let mut batch = self
            .store
            .find_batch(&entry.batch_id)
            .await?
            .ok_or_else(|| DomainError::BatchNotFound(entry.batch_id.clone()))?;

        batch.trigger(self.time_provider.now_millis())?;
        self.batches_dispatched.fetch_add(1, Ordering::Relaxed);
        self.store.update_batch(&batch).await?;
        self.aggregator.recompute(&batch.job_id).await?;

        info!(
            batch_id = %batch.id,
            job_id = %batch.job_id,
            priority = %entry.priority,
            items = batch.item_ids.len(),
            "Batch triggered"
        );

        let mut failed_items = 0;
        for &item_id in &batch.item_ids {
            match self.process_item(item_id).await {
                Ok(outcome) => {
                    debug!(
                        batch_id = %batch.id,
                        item_id = item_id,
                        duration_ms = outcome.duration_ms,
                        "Item processed"
                    );
                }
                Err(e) => {
                    failed_items += 1;
                    self.item_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        batch_id = %batch.id,
                        item_id = item_id,
                        error = %e,
                        "Item processing failed, continuing with batch"
                    );
                }
            }
        }

        batch.complete(self.time_provider.now_millis())?;
        self.store.update_batch(&batch).await?;
        let job_status = self.aggregator.recompute(&batch.job_id).await?;

        Ok(Some(DispatchReport {
            items: batch.item_ids.len(),
            batch_id: batch.id,
            job_id: batch.job_id,
            failed_items,
            job_status,
        }))
    }

    /// Run one item on its own task so a panicking processor only fails that item
    async fn process_item(&self, item_id: ItemId) -> std::result::Result<ItemOutcome, ItemError> {
        let processor = Arc::clone(&self.processor);
        match tokio::spawn(async move { processor.process(item_id).await }).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => Err(ItemError::Panicked(panic_message(
                join_err.into_panic().as_ref(),
            ))),
            Err(join_err) => Err(ItemError::Request(format!(
                "item task cancelled: {}",
                join_err
            ))),
        }
    }
}
