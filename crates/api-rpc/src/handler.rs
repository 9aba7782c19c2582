//! RPC Method Handlers
//!
//! Thin translation between wire types and the ingest service.

use crate::error::to_rpc_error;
use crate::types::{
    IngestParams, IngestResponse, StatsResponse, StatusRequest, StatusResponse,
};
use batchpace_core::application::ingest::IngestRequest;
use batchpace_core::application::IngestService;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<IngestService>,
}

impl RpcHandler {
    pub fn new(service: Arc<IngestService>) -> Self {
        Self { service }
    }

    /// jobs.ingest.v1
    pub async fn ingest(&self, params: IngestParams) -> Result<IngestResponse, ErrorObjectOwned> {
        let req = IngestRequest::try_from(params).map_err(|e| {
            warn!(error = %e, "Rejected malformed ingest params");
            to_rpc_error(e)
        })?;

        let receipt = self.service.submit(req).await.map_err(to_rpc_error)?;

        Ok(IngestResponse {
            job_id: receipt.job_id,
            status: receipt.status.to_string(),
            batch_count: receipt.batch_count,
        })
    }

    /// jobs.status.v1
    pub async fn status(&self, params: StatusRequest) -> Result<StatusResponse, ErrorObjectOwned> {
        debug!(job_id = %params.job_id, "Status query");
        let report = self
            .service
            .job_report(&params.job_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(report.into())
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        self.service.stats().await.map_err(to_rpc_error)
    }
}
