use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    routes::internal_error,
    services::integrations::{available_providers, IntegrationDescriptor, ProviderId},
    state::AppState,
};

#[derive(Serialize)]
pub struct IntegrationCatalogResponse {
    pub providers: Vec<IntegrationDescriptor>,
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub ok: bool,
}

fn parse_provider(raw: &str) -> Result<ProviderId, (StatusCode, String)> {
    raw.parse::<ProviderId>()
        .map_err(|error| (StatusCode::NOT_FOUND, error.to_string()))
}

pub async fn list_integrations() -> Json<IntegrationCatalogResponse> {
    Json(IntegrationCatalogResponse {
        providers: available_providers(),
    })
}

pub async fn get_integration(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let provider = parse_provider(&provider)?;
    let document = state.store.get(provider).await.map_err(internal_error)?;
    Ok(Json(document))
}

pub async fn save_integration(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(document): Json<Value>,
) -> Result<Json<SaveResponse>, (StatusCode, String)> {
    let provider = parse_provider(&provider)?;
    if !document.is_object() {
        return Err((
            StatusCode::BAD_REQUEST,
            "integration config must be a JSON object".into(),
        ));
    }
    state
        .store
        .put(provider, &document)
        .await
        .map_err(internal_error)?;
    tracing::info!(provider = %provider, "integration config stored");
    Ok(Json(SaveResponse { ok: true }))
}
