//! Batchpace Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{IngestResponse, JobStatusResponse, Priority, StatsResponse};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

/// Batchpace daemon client
///
/// # Example
///
/// ```no_run
/// use batchpace_sdk::BatchpaceClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BatchpaceClient::connect("http://127.0.0.1:9633").await?;
/// let stats = client.stats().await?;
/// println!("pending LOW batches: {}", stats.pending_low);
/// # Ok(())
/// # }
/// ```
pub struct BatchpaceClient {
    client: HttpClient,
}

impl BatchpaceClient {
    /// Connect to the daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9633`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Submit item ids; `None` leaves the priority to the server default (LOW)
    pub async fn ingest(
        &self,
        ids: Vec<i64>,
        priority: Option<Priority>,
    ) -> Result<IngestResponse> {
        let mut params = ObjectParams::new();
        params.insert("ids", ids)?;
        if let Some(priority) = priority {
            params.insert("priority", priority)?;
        }

        let response: IngestResponse = self.client.request("jobs.ingest.v1", params).await?;
        Ok(response)
    }

    /// Status of a job and each of its batches
    pub async fn status(&self, job_id: impl Into<String>) -> Result<JobStatusResponse> {
        let mut params = ObjectParams::new();
        params.insert("job_id", job_id.into())?;

        let response: JobStatusResponse = self.client.request("jobs.status.v1", params).await?;
        Ok(response)
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self.client.request("admin.stats.v1", rpc_params![]).await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let result = BatchpaceClient::connect("not a url").await;
        assert!(matches!(result, Err(SdkError::Connection(_))));
    }

    #[test]
    fn test_error_classification() {
        let err = SdkError::Rpc {
            code: 4000,
            message: "bad id".into(),
        };
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }
}
