// Domain Layer - Pure business logic and entities

pub mod batch;
pub mod error;
pub mod job;
pub mod status;

// Re-exports
pub use batch::{partition_items, Batch, BatchId, ItemId, BATCH_SIZE, MAX_ITEM_ID, MIN_ITEM_ID};
pub use error::DomainError;
pub use job::{Job, JobId, Priority};
pub use status::Status;
