//! Simple SDK Example
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package batchpace-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package batchpace-sdk --example simple
//!    ```

use batchpace_sdk::{BatchpaceClient, Priority};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Batchpace SDK - Simple Example");
    println!("==============================\n");

    // 1. Connect to daemon
    let client = BatchpaceClient::connect("http://127.0.0.1:9633").await?;

    // 2. Submit seven ids: three batches
    let receipt = client
        .ingest(vec![1, 2, 3, 4, 5, 6, 7], Some(Priority::High))
        .await?;
    println!("Submitted {} ({} batches)\n", receipt.job_id, receipt.batch_count);

    // 3. Poll until every batch completed
    loop {
        let job = client.status(&receipt.job_id).await?;
        println!("job {}: {}", job.job_id, job.status);
        for batch in &job.batches {
            println!("  {} {:?} {}", batch.batch_id, batch.item_ids, batch.status);
        }

        if job.batches.iter().all(|b| b.status == "completed") {
            break;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    println!("\n✓ All batches completed");
    Ok(())
}
