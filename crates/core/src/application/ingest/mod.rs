// Ingest Service - submission and status use cases

pub mod query;
pub mod submit;

pub use query::{BatchReport, EngineStats, JobReport};
pub use submit::{validate_request, IngestReceipt, IngestRequest, ValidatedIngest};

use crate::application::dispatcher::Dispatcher;
use crate::application::scheduler::PriorityScheduler;
use crate::domain::JobId;
use crate::error::Result;
use crate::port::{IdProvider, ItemProcessor, JobStore, TimeProvider};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Entry point used by transports.
///
/// Owns the shared store, queue and dispatcher handles.
pub struct IngestService {
    store: Arc<dyn JobStore>,
    scheduler: Arc<PriorityScheduler>,
    dispatcher: Arc<Dispatcher>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    // Highest submission timestamp issued so far
    last_created_at: AtomicI64,
    started: tokio::time::Instant,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn JobStore>,
        scheduler: Arc<PriorityScheduler>,
        dispatcher: Arc<Dispatcher>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            scheduler,
            dispatcher,
            id_provider,
            time_provider,
            last_created_at: AtomicI64::new(i64::MIN),
            started: tokio::time::Instant::now(),
        }
    }

    /// Build the whole engine around a store and an item processor
    pub fn with_processor(
        store: Arc<dyn JobStore>,
        processor: Arc<dyn ItemProcessor>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        shutdown: Option<crate::application::dispatcher::ShutdownToken>,
    ) -> Self {
        let scheduler = Arc::new(PriorityScheduler::new());
        let mut dispatcher = Dispatcher::new(
            Arc::clone(&store),
            Arc::clone(&scheduler),
            processor,
            Arc::clone(&time_provider),
        );
        if let Some(token) = shutdown {
            dispatcher = dispatcher.with_shutdown(token);
        }
        Self::new(
            store,
            scheduler,
            Arc::new(dispatcher),
            id_provider,
            time_provider,
        )
    }

    /// Validate, store and enqueue a submission
    pub async fn submit(&self, req: IngestRequest) -> Result<IngestReceipt> {
        submit::execute(
            self.store.as_ref(),
            &self.scheduler,
            &self.dispatcher,
            self.id_provider.as_ref(),
            self.next_created_at(),
            req,
        )
        .await
    }

    /// Wall-clock time clamped so it never goes backwards
    fn next_created_at(&self) -> i64 {
        let now = self.time_provider.now_millis();
        let previous = self.last_created_at.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }

    /// Current status of a job and its batches
    pub async fn job_report(&self, job_id: &JobId) -> Result<JobReport> {
        query::job_report(self.store.as_ref(), job_id).await
    }

    /// Engine-wide counters
    pub async fn stats(&self) -> Result<EngineStats> {
        query::engine_stats(
            self.store.as_ref(),
            &self.scheduler,
            &self.dispatcher,
            self.started.elapsed().as_secs(),
        )
        .await
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn scheduler(&self) -> &Arc<PriorityScheduler> {
        &self.scheduler
    }
}
