//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types served by the daemon.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch priority of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response from jobs.ingest.v1
#[derive(Debug, Clone, Deserialize)]
pub struct IngestResponse {
    pub job_id: String,
    pub status: String,
    pub batch_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchStatus {
    pub batch_id: String,
    pub item_ids: Vec<u64>,
    pub status: String,
}

/// Response from jobs.status.v1
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub priority: Priority,
    pub created_at: i64,
    pub batches: Vec<BatchStatus>,
}

/// Response from admin.stats.v1
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(assert_ok!(serde_json::to_value(Priority::High)), json!("HIGH"));
        let p: Priority = assert_ok!(serde_json::from_value(json!("MEDIUM")));
        assert_eq!(p, Priority::Medium);
        assert_err!(serde_json::from_value::<Priority>(json!("high")));
    }

    #[test]
    fn test_status_response_decodes() {
        let resp: JobStatusResponse = assert_ok!(serde_json::from_value(json!({
            "job_id": "j1",
            "status": "triggered",
            "priority": "LOW",
            "created_at": 1700000000000_i64,
            "batches": [{"batch_id": "b0", "item_ids": [1, 2, 3], "status": "triggered"}]
        })));
        assert_eq!(resp.priority, Priority::Low);
        assert_eq!(resp.batches[0].item_ids, vec![1, 2, 3]);
    }
}
