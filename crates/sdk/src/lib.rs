//! Batchpace SDK - Rust Client Library
//!
//! Typed client for the Batchpace daemon's JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use batchpace_sdk::{BatchpaceClient, Priority};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BatchpaceClient::connect("http://127.0.0.1:9633").await?;
//!
//!     let receipt = client.ingest(vec![1, 2, 3, 4], Some(Priority::High)).await?;
//!     println!("Job submitted: {} ({} batches)", receipt.job_id, receipt.batch_count);
//!
//!     let job = client.status(&receipt.job_id).await?;
//!     println!("Status: {}", job.status);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::BatchpaceClient;
pub use error::{Result, SdkError};
pub use types::{BatchStatus, IngestResponse, JobStatusResponse, Priority, StatsResponse};
