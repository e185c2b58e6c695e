use reqwest::Client;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::IntegrationError;
use crate::services::integrations::{complete_shape, AnyConfig, ProviderConfig, ProviderId};
use crate::services::probe::join_url;

/// Reads and writes capsule configs through the admin backend.
///
/// Every provider lives at its own path, so a save only ever rewrites the
/// document of the provider being saved.
#[derive(Clone)]
pub struct ConfigStoreClient {
    client: Client,
    base_url: String,
}

impl ConfigStoreClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, provider: ProviderId) -> String {
        join_url(&self.base_url, &provider.config_path())
    }

    /// Fails open: any error is logged and the compiled-in default returned.
    pub async fn load<C: ProviderConfig>(&self) -> C {
        let provider = C::PROVIDER;
        let loaded = self.fetch(provider).await.and_then(|value| {
            complete_shape::<C>(value).map_err(|err| decode_error(provider, err))
        });
        match loaded {
            Ok(config) => config,
            Err(error) => {
                warn!(
                    provider = %provider,
                    %error,
                    "failed to load integration config; using defaults"
                );
                C::default()
            }
        }
    }

    pub async fn load_any(&self, provider: ProviderId) -> AnyConfig {
        let loaded = self.fetch(provider).await.and_then(|value| {
            AnyConfig::from_value(provider, value).map_err(|err| decode_error(provider, err))
        });
        match loaded {
            Ok(config) => config,
            Err(error) => {
                warn!(
                    provider = %provider,
                    %error,
                    "failed to load integration config; using defaults"
                );
                AnyConfig::defaults(provider)
            }
        }
    }

    /// Fails closed: a non-2xx answer becomes [`IntegrationError::SaveRejected`].
    pub async fn save<C: ProviderConfig>(&self, config: &C) -> Result<(), IntegrationError> {
        let body = serde_json::to_value(config).map_err(|err| decode_error(C::PROVIDER, err))?;
        self.post(C::PROVIDER, &body).await
    }

    pub async fn save_any(&self, config: &AnyConfig) -> Result<(), IntegrationError> {
        let provider = config.provider();
        let body = config.to_value().map_err(|err| decode_error(provider, err))?;
        self.post(provider, &body).await
    }

    async fn fetch(&self, provider: ProviderId) -> Result<Value, IntegrationError> {
        let response = self.client.get(self.url(provider)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IntegrationError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| decode_error(provider, err))
    }

    async fn post(&self, provider: ProviderId, body: &Value) -> Result<(), IntegrationError> {
        let response = self.client.post(self.url(provider)).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(provider = %provider, %status, "backend rejected integration config");
            return Err(IntegrationError::SaveRejected {
                status: status.as_u16(),
            });
        }
        info!(provider = %provider, "integration config saved");
        Ok(())
    }
}

fn decode_error(provider: ProviderId, err: serde_json::Error) -> IntegrationError {
    IntegrationError::Payload(format!("{provider} config: {err}"))
}
