// HTTP fetch processor: one GET per item
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use batchpace_core::domain::ItemId;
use batchpace_core::error::AppError;
use batchpace_core::port::{ItemError, ItemOutcome, ItemProcessor};

/// Placeholder replaced with the item id in the URL template
pub const ID_PLACEHOLDER: &str = "{id}";

/// Default per-request timeout (30s)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches `url_template` with `{id}` substituted for every item.
///
/// Transport errors, timeouts and non-2xx responses are item failures.
pub struct HttpFetchProcessor {
    client: reqwest::Client,
    url_template: String,
    timeout: Duration,
}

impl HttpFetchProcessor {
    /// Create a new HTTP processor
    ///
    /// # Arguments
    /// * `url_template` - URL containing `{id}`, e.g. `http://host/items/{id}`
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// `AppError::Config` if the template has no `{id}` or the client cannot be built
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        Self::from_builder(url_template, timeout, reqwest::Client::builder())
    }

    fn from_builder(
        url_template: impl Into<String>,
        timeout: Duration,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, AppError> {
        let url_template = url_template.into();
        if !url_template.contains(ID_PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "fetch URL '{}' must contain {}",
                url_template, ID_PLACEHOLDER
            )));
        }

        let client = builder
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url_template,
            timeout,
        })
    }

    fn url_for(&self, item_id: ItemId) -> String {
        self.url_template
            .replace(ID_PLACEHOLDER, &item_id.to_string())
    }
}

#[async_trait]
impl ItemProcessor for HttpFetchProcessor {
    async fn process(&self, item_id: ItemId) -> Result<ItemOutcome, ItemError> {
        let url = self.url_for(item_id);
        let start = Instant::now();

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ItemError::Timeout(self.timeout.as_millis() as u64)
            } else {
                ItemError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(item_id = item_id, url = %url, status = status.as_u16(), "Fetch rejected");
            return Err(ItemError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ItemError::Request(e.to_string()))?;

        let duration_ms = start.elapsed().as_millis() as i64;
        debug!(item_id = item_id, bytes = body.len(), duration_ms = duration_ms, "Fetched item");

        Ok(ItemOutcome {
            item_id,
            duration_ms,
            detail: Some(format!("{} bytes", body.len())),
        })
    }
}
