use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use besst_api::{config::AppConfig, routes, state::AppState, storage::FileConfigStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let state = AppState {
        store: Arc::new(FileConfigStore::new(&config.integrations_dir)),
        stocks_snapshot: config.stocks_snapshot.clone(),
    };

    let app = routes::router(state);

    tracing::info!(
        dir = %config.integrations_dir.display(),
        "BESST API listening on {}",
        config.bind_addr
    );

    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr)
            .await
            .expect("failed to bind address"),
        app,
    )
    .await
    .expect("server error");
}
