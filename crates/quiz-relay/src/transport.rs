use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::config::RelayConfig;
use crate::form::LeadForm;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("relay request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("relay answered with status {status}")]
    Status { status: u16 },
}

/// Delivers one lead form. Implementations make a single attempt; retrying is up to the user.
#[async_trait]
pub trait LeadRelay: Send + Sync {
    async fn deliver(&self, form: &LeadForm) -> Result<(), TransportError>;
}

/// Posts the form as `multipart/form-data` to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpRelay {
    /// Builds a client whose requests give up after `config.timeout`; a hung relay surfaces
    /// as [`TransportError::Network`].
    pub fn new(config: &RelayConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LeadRelay for HttpRelay {
    async fn deliver(&self, form: &LeadForm) -> Result<(), TransportError> {
        tracing::info!(endpoint = %self.endpoint, "submitting lead");

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form.to_multipart())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("relay response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("relay rejected lead with status {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        tracing::info!("lead delivered");
        Ok(())
    }
}

/// Logs the form instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRelay;

#[async_trait]
impl LeadRelay for DryRunRelay {
    async fn deliver(&self, form: &LeadForm) -> Result<(), TransportError> {
        for (name, value) in form.redacted_fields() {
            tracing::info!(field = name, "{}", value);
        }
        Ok(())
    }
}
