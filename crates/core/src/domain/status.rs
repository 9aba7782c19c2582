// Progress Status shared by batches and jobs

use serde::{Deserialize, Serialize};

/// Progress status.
///
/// For a batch this is a stored, monotonic state
/// (`YetToStart -> Triggered -> Completed`). For a job it is always derived
/// from the statuses of its batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    YetToStart,
    Triggered,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::YetToStart => "yet_to_start",
            Status::Triggered => "triggered",
            Status::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
