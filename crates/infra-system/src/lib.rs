// Batchpace Infrastructure - System Adapters
// Implements: ItemProcessor

pub mod http_processor;
pub mod simulated_processor;

pub use http_processor::HttpFetchProcessor;
pub use simulated_processor::SimulatedFetchProcessor;
