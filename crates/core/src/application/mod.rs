// Application Layer - Use Cases and the scheduling engine

pub mod aggregator;
pub mod dispatcher;
pub mod ingest;
pub mod scheduler;

// Re-exports
pub use aggregator::{aggregate, StatusAggregator};
pub use dispatcher::{shutdown_channel, Dispatcher, ShutdownSender, ShutdownToken};
pub use ingest::IngestService;
pub use scheduler::{PendingBatch, PriorityScheduler};
