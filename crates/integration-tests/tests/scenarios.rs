//! End-to-end submission scenarios against the in-process engine
//!
//! Time is paused, so rate-limit waits complete instantly in wall-clock terms.

use std::sync::Arc;
use std::time::Duration;

use batchpace_core::application::ingest::IngestRequest;
use batchpace_core::application::IngestService;
use batchpace_core::domain::{Priority, Status};
use batchpace_core::error::AppError;
use batchpace_core::infrastructure::InMemoryJobStore;
use batchpace_core::port::id_provider::mocks::SequentialIdProvider;
use batchpace_core::port::item_processor::mocks::MockItemProcessor;
use batchpace_core::port::time_provider::mocks::ManualTimeProvider;
use tokio_test::{assert_err, assert_ok};

fn engine(processor: Arc<MockItemProcessor>) -> IngestService {
    IngestService::with_processor(
        Arc::new(InMemoryJobStore::new()),
        processor,
        Arc::new(SequentialIdProvider::new("job")),
        Arc::new(ManualTimeProvider::new(1_700_000_000_000)),
        None,
    )
}

fn request(ids: Vec<i64>, priority: Option<&str>) -> IngestRequest {
    IngestRequest {
        ids,
        priority: priority.map(str::to_string),
    }
}

async fn wait_until_idle(service: &IngestService) {
    while service.dispatcher().is_running() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Scenario A: four HIGH ids become [1,2,3] and [4]; job starts yet_to_start
#[tokio::test(start_paused = true)]
async fn test_scenario_a_split_and_initial_status() {
    let service = engine(Arc::new(MockItemProcessor::new_success()));

    let receipt = assert_ok!(service.submit(request(vec![1, 2, 3, 4], Some("HIGH"))).await);
    assert_eq!(receipt.status, Status::YetToStart);
    assert_eq!(receipt.batch_count, 2);

    let report = assert_ok!(service.job_report(&receipt.job_id).await);
    assert_eq!(report.status, Status::YetToStart);
    assert_eq!(report.priority, Priority::High);
    let items: Vec<Vec<u64>> = report.batches.iter().map(|b| b.item_ids.clone()).collect();
    assert_eq!(items, vec![vec![1, 2, 3], vec![4]]);
}

/// Scenario B: a LOW submission waits behind every pending HIGH batch
#[tokio::test(start_paused = true)]
async fn test_scenario_b_low_after_all_high() {
    let processor = Arc::new(MockItemProcessor::new_success());
    let service = engine(processor.clone());

    let high = assert_ok!(
        service
            .submit(request(vec![1, 2, 3, 4, 5, 6, 7, 8, 9], Some("HIGH")))
            .await
    );
    let low = assert_ok!(service.submit(request(vec![5], None)).await);

    let low_report = assert_ok!(service.job_report(&low.job_id).await);
    assert_eq!(low_report.priority, Priority::Low);

    wait_until_idle(&service).await;

    assert_eq!(processor.processed_ids(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 5]);
    assert_eq!(
        assert_ok!(service.job_report(&high.job_id).await).status,
        Status::Completed
    );
}

/// Scenario C: an out-of-range id is rejected and nothing is created
#[tokio::test(start_paused = true)]
async fn test_scenario_c_rejects_negative_id() {
    let processor = Arc::new(MockItemProcessor::new_success());
    let service = engine(processor.clone());

    let err = assert_err!(service.submit(request(vec![-1], None)).await);
    assert!(matches!(err, AppError::Validation(_)));

    for bad in [
        request(vec![], None),
        request(vec![0], None),
        request(vec![1_000_000_008], None),
        request(vec![1], Some("URGENT")),
        request(vec![1], Some("high")),
    ] {
        assert_err!(service.submit(bad).await);
    }

    let stats = assert_ok!(service.stats().await);
    assert_eq!(stats.jobs_yet_to_start + stats.jobs_triggered + stats.jobs_completed, 0);
    assert!(service.scheduler().is_empty());
    assert!(!service.dispatcher().is_running());
    assert_eq!(processor.call_count(), 0);
}

/// Scenario D: once every batch ran, the job and all batches are completed
#[tokio::test(start_paused = true)]
async fn test_scenario_d_all_completed() {
    let service = engine(Arc::new(
        MockItemProcessor::failing_for([2]).with_latency(Duration::from_millis(300)),
    ));

    let receipt = assert_ok!(service.submit(request(vec![1, 2, 3, 4, 5], Some("MEDIUM"))).await);
    wait_until_idle(&service).await;

    let report = assert_ok!(service.job_report(&receipt.job_id).await);
    assert_eq!(report.status, Status::Completed);
    assert!(report.batches.iter().all(|b| b.status == Status::Completed));

    let stats = assert_ok!(service.stats().await);
    assert_eq!(stats.jobs_completed, 1);
    assert_eq!(stats.batches_completed, 2);
    assert_eq!(stats.item_failures, 1);
}

/// Scenario E: unknown job id is not found
#[tokio::test(start_paused = true)]
async fn test_scenario_e_unknown_job() {
    let service = engine(Arc::new(MockItemProcessor::new_success()));
    let err = assert_err!(service.job_report(&"job-404".to_string()).await);
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn test_max_id_accepted_and_priority_defaults_low() {
    let service = engine(Arc::new(MockItemProcessor::new_success()));

    let receipt = assert_ok!(service.submit(request(vec![1, 1_000_000_007], None)).await);
    let report = assert_ok!(service.job_report(&receipt.job_id).await);
    assert_eq!(report.priority, Priority::Low);
    assert_eq!(report.batches[0].item_ids, vec![1, 1_000_000_007]);
}
