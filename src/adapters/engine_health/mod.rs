// Engine health adapter - Readiness check against the streaming engine HTTP API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Polls a version/status endpoint; HTTP 200 means ready
pub struct HttpEngineHealthAdapter {
    client: Client,
    health_url: String,
}

impl HttpEngineHealthAdapter {
    /// `request_timeout` bounds each individual health request
    pub fn new(health_url: impl Into<String>, request_timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DomainError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            health_url: health_url.into(),
        })
    }
}

#[async_trait]
impl EngineHealthPort for HttpEngineHealthAdapter {
    async fn is_ready(&self) -> bool {
        match self.client.get(&self.health_url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!("Engine not answering at {}: {}", self.health_url, e);
                false
            }
        }
    }
}
