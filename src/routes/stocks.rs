use axum::{extract::State, http::StatusCode, Json};
use tokio::fs;

use crate::{models::Stock, routes::internal_error, state::AppState};

/// Serves the ranking snapshot when one is configured, otherwise an empty list.
pub async fn list_stocks(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stock>>, (StatusCode, String)> {
    let Some(path) = state.stocks_snapshot.as_ref() else {
        return Ok(Json(Vec::new()));
    };
    let bytes = fs::read(path).await.map_err(internal_error)?;
    let stocks: Vec<Stock> = serde_json::from_slice(&bytes).map_err(internal_error)?;
    Ok(Json(stocks))
}
