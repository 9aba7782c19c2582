//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use batchpace_core::application::ingest::{EngineStats, IngestRequest, JobReport};
use batchpace_core::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// jobs.ingest.v1 - Submit item ids
///
/// Fields are taken as raw JSON so malformed values surface as validation
/// errors instead of generic parse errors.
#[derive(Debug, Deserialize)]
pub struct IngestParams {
    #[serde(default)]
    pub ids: Value,
    #[serde(default)]
    pub priority: Value,
}

impl TryFrom<IngestParams> for IngestRequest {
    type Error = AppError;

    fn try_from(params: IngestParams) -> Result<Self, Self::Error> {
        let raw_ids = match params.ids {
            Value::Array(items) => items,
            other => {
                return Err(AppError::Validation(format!(
                    "ids must be an array of integers, got {}",
                    other
                )))
            }
        };

        let ids = raw_ids
            .iter()
            .map(|v| {
                v.as_i64().ok_or_else(|| {
                    AppError::Validation(format!("id {} is not an integer", v))
                })
            })
            .collect::<Result<Vec<i64>, AppError>>()?;

        let priority = match params.priority {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => {
                return Err(AppError::Validation(format!(
                    "priority must be a string, got {}",
                    other
                )))
            }
        };

        Ok(IngestRequest { ids, priority })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub job_id: String,
    pub status: String,
    pub batch_count: usize,
}

/// jobs.status.v1 - Job status
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub job_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub batch_id: String,
    pub item_ids: Vec<u64>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub job_id: String,
    pub status: String,
    pub priority: String,
    pub created_at: i64,
    pub batches: Vec<BatchEntry>,
}

impl From<JobReport> for StatusResponse {
    fn from(report: JobReport) -> Self {
        Self {
            job_id: report.job_id,
            status: report.status.to_string(),
            priority: report.priority.to_string(),
            created_at: report.created_at,
            batches: report
                .batches
                .into_iter()
                .map(|b| BatchEntry {
                    batch_id: b.batch_id,
                    item_ids: b.item_ids,
                    status: b.status.to_string(),
                })
                .collect(),
        }
    }
}

/// admin.stats.v1 - Engine statistics
pub type StatsResponse = EngineStats;
