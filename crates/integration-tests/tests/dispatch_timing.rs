//! Rate-limit spacing and single-active-dispatcher behaviour

use std::sync::Arc;
use std::time::Duration;

use batchpace_core::application::ingest::IngestRequest;
use batchpace_core::application::IngestService;
use batchpace_core::domain::Status;
use batchpace_core::infrastructure::InMemoryJobStore;
use batchpace_core::port::id_provider::mocks::SequentialIdProvider;
use batchpace_core::port::item_processor::mocks::MockItemProcessor;
use batchpace_core::port::time_provider::mocks::ManualTimeProvider;
use tokio_test::assert_ok;

const INTERVAL: Duration = Duration::from_millis(5000);
const ITEM_LATENCY: Duration = Duration::from_millis(1000);

fn engine(processor: Arc<MockItemProcessor>) -> IngestService {
    IngestService::with_processor(
        Arc::new(InMemoryJobStore::new()),
        processor,
        Arc::new(SequentialIdProvider::new("job")),
        Arc::new(ManualTimeProvider::new(0)),
        None,
    )
}

fn request(ids: Vec<i64>, priority: &str) -> IngestRequest {
    IngestRequest {
        ids,
        priority: Some(priority.to_string()),
    }
}

async fn wait_until_idle(service: &IngestService) {
    while service.dispatcher().is_running() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_consecutive_batches_spaced_from_completion() {
    let processor = Arc::new(MockItemProcessor::new_success().with_latency(ITEM_LATENCY));
    let service = engine(processor.clone());

    assert_ok!(service.submit(request((1..=9).collect(), "HIGH")).await);
    wait_until_idle(&service).await;

    let calls = processor.calls();
    assert_eq!(calls.len(), 9);

    // Items within a batch run back to back, no rate-limit gap between them
    for batch in calls.chunks(3) {
        for pair in batch.windows(2) {
            let gap = pair[1].started - pair[0].started;
            assert!(gap >= ITEM_LATENCY && gap < ITEM_LATENCY + Duration::from_millis(10));
        }
    }

    // Next batch starts no sooner than the interval after the previous one finished
    for pair in calls.chunks(3).collect::<Vec<_>>().windows(2) {
        let previous_done = pair[0][2].started + ITEM_LATENCY;
        let next_start = pair[1][0].started;
        assert!(next_start - previous_done >= INTERVAL);
    }
}

#[tokio::test(start_paused = true)]
async fn test_job_status_walks_forward_only() {
    let processor = Arc::new(MockItemProcessor::new_success().with_latency(ITEM_LATENCY));
    let service = engine(processor);

    let receipt = assert_ok!(service.submit(request(vec![1, 2, 3, 4, 5, 6], "LOW")).await);

    let rank = |s: Status| match s {
        Status::YetToStart => 0,
        Status::Triggered => 1,
        Status::Completed => 2,
    };

    let mut previous_batches = vec![Status::YetToStart; 2];
    let mut seen_triggered = false;
    loop {
        let report = assert_ok!(service.job_report(&receipt.job_id).await);
        for (i, batch) in report.batches.iter().enumerate() {
            assert!(rank(batch.status) >= rank(previous_batches[i]));
            previous_batches[i] = batch.status;
        }
        seen_triggered |= report.status == Status::Triggered;

        if report.batches.iter().all(|b| b.status == Status::Completed) {
            assert_eq!(report.status, Status::Completed);
            break;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    assert!(seen_triggered);
}

#[tokio::test(start_paused = true)]
async fn test_single_dispatcher_across_bursts() {
    let processor = Arc::new(MockItemProcessor::new_success().with_latency(ITEM_LATENCY));
    let service = engine(processor.clone());

    for chunk in [vec![1, 2, 3, 4], vec![5], vec![6, 7]] {
        assert_ok!(service.submit(request(chunk, "MEDIUM")).await);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    wait_until_idle(&service).await;

    let stats = service.dispatcher().stats();
    assert_eq!(stats.runs_started, 1);
    assert_eq!(stats.batches_dispatched, 4);

    // One consumer means item calls never overlap
    let calls = processor.calls();
    for pair in calls.windows(2) {
        assert!(pair[1].started - pair[0].started >= ITEM_LATENCY);
    }
}

#[tokio::test(start_paused = true)]
async fn test_new_run_still_respects_interval() {
    let processor = Arc::new(MockItemProcessor::new_success());
    let service = engine(processor.clone());

    assert_ok!(service.submit(request(vec![1], "HIGH")).await);
    wait_until_idle(&service).await;
    let finished = service
        .dispatcher()
        .last_processed()
        .expect("dispatch recorded");

    // Queue drained, run ended; a later submission starts a fresh run
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_ok!(service.submit(request(vec![2], "HIGH")).await);
    wait_until_idle(&service).await;

    let calls = processor.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].started - finished >= INTERVAL);
    assert_eq!(service.dispatcher().stats().runs_started, 2);
}
