pub mod integrations;
pub mod stocks;

use std::fmt::Display;

use axum::{http::StatusCode, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn internal_error<E: Display>(error: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/admin/integrations",
            get(integrations::list_integrations),
        )
        .route(
            "/api/admin/integrations/{provider}",
            get(integrations::get_integration).post(integrations::save_integration),
        )
        .route("/api/stocks", get(stocks::list_stocks))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
