//! HTTP Live Inventory Client
//!
//! Issues one `GET` to the media server's inventory endpoint per call. Every
//! request is bounded by the configured timeout; failures surface as
//! `InventoryError` and are never retried here.

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    domain::{InventoryError, LiveInventory, LiveStream},
    infrastructure::dto::inventory::InventoryResponse,
};

/// Live inventory fetched over HTTP
#[derive(Debug, Clone)]
pub struct HttpLiveInventory {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLiveInventory {
    /// Create a client for `endpoint`, e.g. `http://127.0.0.1:1985/api/v1/streams`
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Request` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| InventoryError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LiveInventory for HttpLiveInventory {
    async fn fetch_active_streams(&self) -> Result<Vec<LiveStream>, InventoryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| InventoryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| InventoryError::Request(e.to_string()))?;
        let inventory: InventoryResponse =
            serde_json::from_slice(&body).map_err(|e| InventoryError::Decode(e.to_string()))?;

        if inventory.code != 0 {
            return Err(InventoryError::Code(inventory.code));
        }

        tracing::debug!(
            "Fetched {} active streams from {}",
            inventory.streams.len(),
            self.endpoint
        );
        Ok(inventory.streams.into_iter().map(LiveStream::from).collect())
    }
}
