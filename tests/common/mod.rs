#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use besst_api::services::config_store::ConfigStoreClient;
use besst_api::services::http_client;
use besst_api::services::probe::ConnectionProber;
use besst_api::services::registry::IntegrationRegistry;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn store(base_url: &str) -> ConfigStoreClient {
    ConfigStoreClient::new(http_client().unwrap(), base_url)
}

pub fn prober() -> ConnectionProber {
    ConnectionProber::new(http_client().unwrap())
}

pub fn registry(base_url: &str) -> IntegrationRegistry {
    IntegrationRegistry::new(store(base_url), prober())
}

/// The real admin backend over a file store rooted at `dir`.
pub async fn spawn_backend(dir: &std::path::Path) -> String {
    let state = besst_api::state::AppState {
        store: Arc::new(besst_api::storage::FileConfigStore::new(dir)),
        stocks_snapshot: None,
    };
    spawn(besst_api::routes::router(state)).await
}
