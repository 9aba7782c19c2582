//! Batchpace CLI - submit ids and inspect jobs over JSON-RPC

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9633";

#[derive(Parser)]
#[command(name = "batchpace")]
#[command(about = "Batchpace dispatch engine CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "BATCHPACE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit item ids for processing
    Ingest {
        /// Comma-separated item ids (e.g. 1,2,3)
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,

        /// HIGH, MEDIUM or LOW (server default: LOW)
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Show a job and its batches
    Status {
        /// Job ID
        job_id: String,
    },

    /// Show engine statistics
    Stats,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct IngestResult {
    job_id: String,
    status: String,
    batch_count: usize,
}

#[derive(Deserialize)]
struct JobStatus {
    job_id: String,
    status: String,
    priority: String,
    created_at: i64,
    batches: Vec<BatchStatus>,
}

#[derive(Deserialize)]
struct BatchStatus {
    batch_id: String,
    item_ids: Vec<u64>,
    status: String,
}

#[derive(Tabled)]
struct BatchRow {
    batch_id: String,
    item_ids: String,
    status: String,
}

impl From<BatchStatus> for BatchRow {
    fn from(b: BatchStatus) -> Self {
        Self {
            batch_id: b.batch_id,
            item_ids: b
                .item_ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(","),
            status: b.status,
        }
    }
}

fn colored_status(status: &str) -> colored::ColoredString {
    match status {
        "completed" => status.green(),
        "triggered" => status.yellow(),
        _ => status.normal(),
    }
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { ids, priority } => {
            let mut params = json!({ "ids": ids });
            if let Some(priority) = priority {
                params["priority"] = json!(priority);
            }

            let result = call_rpc(&cli.rpc_url, "jobs.ingest.v1", params).await?;
            let ingest_result: IngestResult = serde_json::from_value(result)?;

            println!("{}", "✓ Submission accepted".green().bold());
            println!();
            println!("{}", Table::new(vec![ingest_result]));
        }

        Commands::Status { job_id } => {
            let result = call_rpc(&cli.rpc_url, "jobs.status.v1", json!({ "job_id": job_id })).await?;
            let job: JobStatus = serde_json::from_value(result)?;

            println!("  {} {}", "Job:".bold(), job.job_id);
            println!("  {} {}", "Status:".bold(), colored_status(&job.status));
            println!("  {} {}", "Priority:".bold(), job.priority);
            println!("  {} {}", "Created:".bold(), job.created_at);
            println!();

            let rows: Vec<BatchRow> = job.batches.into_iter().map(BatchRow::from).collect();
            println!("{}", Table::new(rows));
        }

        Commands::Stats => {
            println!("{}", "Engine Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!(
                        "  {} {} yet_to_start / {} triggered / {} completed",
                        "Jobs:".bold(),
                        stats["jobs_yet_to_start"],
                        stats["jobs_triggered"],
                        stats["jobs_completed"]
                    );
                    println!(
                        "  {} {} yet_to_start / {} triggered / {} completed",
                        "Batches:".bold(),
                        stats["batches_yet_to_start"],
                        stats["batches_triggered"],
                        stats["batches_completed"]
                    );
                    println!(
                        "  {} HIGH {} / MEDIUM {} / LOW {}",
                        "Pending:".bold(),
                        stats["pending_high"],
                        stats["pending_medium"],
                        stats["pending_low"]
                    );
                    let dispatcher = if stats["dispatcher_running"].as_bool().unwrap_or(false) {
                        "RUNNING".yellow()
                    } else {
                        "IDLE".normal()
                    };
                    println!("  {} {}", "Dispatcher:".bold(), dispatcher);
                    println!("  {} {}", "Item failures:".bold(), stats["item_failures"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingest_ids() {
        let cli = Cli::try_parse_from(["batchpace", "ingest", "--ids", "1,2,3", "-p", "HIGH"]).unwrap();
        match cli.command {
            Commands::Ingest { ids, priority } => {
                assert_eq!(ids, vec![1, 2, 3]);
                assert_eq!(priority.as_deref(), Some("HIGH"));
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_ingest_requires_ids() {
        assert!(Cli::try_parse_from(["batchpace", "ingest"]).is_err());
        assert!(Cli::try_parse_from(["batchpace", "ingest", "--ids", "1,x"]).is_err());
    }

    #[test]
    fn test_batch_row_joins_ids() {
        let row = BatchRow::from(BatchStatus {
            batch_id: "b0".into(),
            item_ids: vec![4, 5],
            status: "triggered".into(),
        });
        assert_eq!(row.item_ids, "4,5");
    }
}
