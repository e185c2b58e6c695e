use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::IntegrationError;
use crate::models::ProbeResult;
use crate::services::card::{CardActions, CardPatch, CardView};
use crate::services::config_store::ConfigStoreClient;
use crate::services::integrations::{
    available_providers, AnyConfig, IntegrationDescriptor, ProviderId,
};
use crate::services::lifecycle::MountGuard;
use crate::services::probe::ConnectionProber;

/// Holds one config per provider and routes toggle/save/test to exactly one
/// capsule. The slot array is indexed by [`ProviderId::index`].
pub struct IntegrationRegistry {
    store: ConfigStoreClient,
    prober: ConnectionProber,
    slots: [AnyConfig; 5],
}

impl IntegrationRegistry {
    pub fn new(store: ConfigStoreClient, prober: ConnectionProber) -> Self {
        Self {
            store,
            prober,
            slots: ProviderId::ALL.map(AnyConfig::defaults),
        }
    }

    /// Catalog entries in slot order.
    pub fn descriptors(&self) -> Vec<IntegrationDescriptor> {
        available_providers()
    }

    pub fn config(&self, provider: ProviderId) -> &AnyConfig {
        &self.slots[provider.index()]
    }

    pub fn configs(&self) -> impl Iterator<Item = &AnyConfig> {
        self.slots.iter()
    }

    pub fn card(&self, provider: ProviderId) -> CardView {
        self.config(provider).view()
    }

    /// Handle implementing the card callbacks for one provider.
    pub fn slot(&mut self, provider: ProviderId) -> ProviderSlot<'_> {
        ProviderSlot {
            registry: self,
            provider,
        }
    }

    /// Issues all five loads at once and applies each as soon as it lands.
    /// Once `guard` is unmounted the remaining responses are dropped.
    /// Returns how many slots were replaced.
    pub async fn load_all(&mut self, guard: &MountGuard) -> usize {
        let store = &self.store;
        let slots = &mut self.slots;
        let mut pending: FuturesUnordered<_> = ProviderId::ALL
            .into_iter()
            .map(|provider| async move { (provider, store.load_any(provider).await) })
            .collect();

        let mut applied = 0usize;
        while let Some((provider, config)) = pending.next().await {
            if !guard.is_mounted() {
                debug!(
                    provider = %provider,
                    "discarding integration config loaded after unmount"
                );
                return applied;
            }
            slots[provider.index()] = config;
            applied += 1;
        }
        info!(applied, "integration configs loaded");
        applied
    }

    pub async fn toggle(
        &mut self,
        provider: ProviderId,
        enabled: bool,
    ) -> Result<(), IntegrationError> {
        let updated = self.config(provider).with_enabled(enabled);
        self.commit(updated).await
    }

    /// Merges `partial` into the provider's current config, shows it
    /// immediately and then persists it. A failed write is returned but the
    /// in-memory config is not rolled back.
    pub async fn save(
        &mut self,
        provider: ProviderId,
        partial: Value,
    ) -> Result<(), IntegrationError> {
        let updated = self.config(provider).with_patch(partial)?;
        self.commit(updated).await
    }

    pub async fn test(&self, provider: ProviderId) -> ProbeResult {
        self.prober.test_any(self.config(provider)).await
    }

    async fn commit(&mut self, updated: AnyConfig) -> Result<(), IntegrationError> {
        let provider = updated.provider();
        self.slots[provider.index()] = updated;
        let result = self.store.save_any(&self.slots[provider.index()]).await;
        if let Err(error) = &result {
            error!(provider = %provider, %error, "failed to persist integration config");
        }
        result
    }
}

pub struct ProviderSlot<'a> {
    registry: &'a mut IntegrationRegistry,
    provider: ProviderId,
}

#[async_trait]
impl CardActions for ProviderSlot<'_> {
    async fn on_toggle(&mut self, enabled: bool) -> Result<(), IntegrationError> {
        self.registry.toggle(self.provider, enabled).await
    }

    async fn on_save(&mut self, patch: CardPatch) -> Result<(), IntegrationError> {
        let partial = self.registry.config(self.provider).card_patch(&patch);
        self.registry.save(self.provider, partial).await
    }

    async fn on_test(&mut self) -> ProbeResult {
        self.registry.test(self.provider).await
    }
}
