pub mod card;
pub mod config_store;
pub mod dashboard;
pub mod integrations;
pub mod lifecycle;
pub mod probe;
pub mod providers;
pub mod registry;

use reqwest::{header, Client};

/// Shared HTTP client for the store, the prober and the dashboard loaders.
pub fn http_client() -> reqwest::Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json, text/csv, */*"),
    );
    Client::builder()
        .user_agent(concat!("besst-api/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()
}
