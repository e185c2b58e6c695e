use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::IntegrationError;
use crate::services::integrations::{AnyConfig, ProviderId};

/// One JSON document per provider under `dir`, named `{slug}.json`.
pub struct FileConfigStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self, provider: ProviderId) -> PathBuf {
        self.dir.join(format!("{}.json", provider.slug()))
    }

    /// The stored document, or the provider's defaults when none was saved.
    pub async fn get(&self, provider: ProviderId) -> Result<Value, IntegrationError> {
        match fs::read(self.path(provider)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                IntegrationError::Payload(format!("{provider} document: {err}"))
            }),
            Err(error) if error.kind() == ErrorKind::NotFound => AnyConfig::defaults(provider)
                .to_value()
                .map_err(|err| IntegrationError::Payload(err.to_string())),
            Err(error) => Err(error.into()),
        }
    }

    /// Replaces the provider's document. Other providers' files are untouched.
    pub async fn put(
        &self,
        provider: ProviderId,
        document: &Value,
    ) -> Result<(), IntegrationError> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|err| IntegrationError::Payload(err.to_string()))?;
        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.dir).await?;
        let target = self.path(provider);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, bytes).await?;
        fs::rename(&staging, &target).await?;
        tracing::debug!(
            provider = %provider,
            path = %target.display(),
            "integration document written"
        );
        Ok(())
    }
}
