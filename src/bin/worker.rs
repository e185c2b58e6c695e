use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use besst_api::config::AppConfig;
use besst_api::services::config_store::ConfigStoreClient;
use besst_api::services::http_client;
use besst_api::services::lifecycle::MountGuard;
use besst_api::services::probe::ConnectionProber;
use besst_api::services::registry::IntegrationRegistry;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let client = http_client().expect("failed to build HTTP client");
    let mut registry = IntegrationRegistry::new(
        ConfigStoreClient::new(client.clone(), config.api_base_url.clone()),
        ConnectionProber::new(client),
    );
    let guard = MountGuard::new();

    let mut interval = tokio::time::interval(config.probe_interval);

    loop {
        interval.tick().await;
        probe_enabled_integrations(&mut registry, &guard).await;
    }
}

async fn probe_enabled_integrations(registry: &mut IntegrationRegistry, guard: &MountGuard) {
    let started = chrono::Utc::now();
    tracing::info!(%started, "refreshing integration configs");
    registry.load_all(guard).await;

    let enabled: Vec<_> = registry
        .configs()
        .filter(|config| config.enabled())
        .map(|config| config.provider())
        .collect();
    if enabled.is_empty() {
        tracing::info!("no integrations enabled; nothing to probe");
        return;
    }

    let mut failures = 0usize;
    for provider in enabled {
        let result = registry.test(provider).await;
        if !result.success {
            failures += 1;
            tracing::error!(
                provider = %provider,
                message = %result.message,
                "integration unreachable"
            );
        }
    }
    tracing::info!(failures, "integration probe round finished");
}
