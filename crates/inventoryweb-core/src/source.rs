//! Where inventory payloads come from

use crate::error::{CoreError, CoreResult};
use crate::models::InventoryPayload;
use async_trait::async_trait;
use inventoryweb_config::Config;
use std::sync::Arc;
use std::time::Duration;

/// A source of inventory payloads. One call is one activation's request.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetch and decode the current inventory
    async fn fetch(&self) -> CoreResult<InventoryPayload>;

    /// Human-readable location, used in logs
    fn endpoint(&self) -> &str;
}

/// Source reference type
pub type SourceRef = Arc<dyn InventorySource>;

/// Plain unauthenticated GET against a fixed URL
#[derive(Clone)]
pub struct HttpInventorySource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpInventorySource {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> CoreResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| CoreError::ClientBuild {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Build from the `endpoint` section of the configuration
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let timeout = match config.endpoint.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self::new(config.endpoint.url.trim(), timeout)
    }
}

#[async_trait]
impl InventorySource for HttpInventorySource {
    async fn fetch(&self) -> CoreResult<InventoryPayload> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        InventoryPayload::from_json(&body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
