// Job Domain Model (one client submission)

use super::batch::BatchId;
use super::error::DomainError;
use super::status::Status;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Job ID (UUID v4)
pub type JobId = String;

/// Submission priority.
///
/// Declaration order is dispatch order: `High` is served before `Medium`,
/// which is served before `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Ordering key (lower is served first)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            other => Err(DomainError::InvalidPriority(other.to_string())),
        }
    }
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub batch_ids: Vec<BatchId>,
    pub priority: Priority,
    pub created_at: i64, // epoch ms, used for same-priority tie-break
    pub status: Status,
}

impl Job {
    /// Create a new Job
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `created_at` - Submission timestamp in epoch ms (injected, not system time)
    /// * `priority` - Dispatch priority shared by all batches
    /// * `batch_ids` - Batches in submission order
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        priority: Priority,
        batch_ids: Vec<BatchId>,
    ) -> Self {
        Self {
            id: id.into(),
            batch_ids,
            priority,
            created_at,
            status: Status::YetToStart,
        }
    }
}
