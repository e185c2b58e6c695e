mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use besst_api::services::dashboard::{
    load_company_directory, load_stock_list, CompanyDirectory, DashboardClient, StockListState,
    STOCKS_LOAD_ERROR,
};
use besst_api::services::http_client;
use besst_api::services::lifecycle::MountGuard;
use besst_api::state::AppState;
use besst_api::storage::FileConfigStore;

fn stock_json(ticker: &str, below: bool) -> Value {
    json!({
        "ticker": ticker,
        "companyName": format!("{ticker} S.A."),
        "sector": "Bancos",
        "currentPrice": 30.5,
        "ceilingPrice": 35.0,
        "dividendYield": 7.2,
        "consistency": 95.0,
        "belowCeiling": below,
    })
}

fn client(base: &str) -> DashboardClient {
    DashboardClient::new(http_client().unwrap(), base)
}

#[tokio::test]
async fn stock_list_loads_array() {
    let app = Router::new().route(
        "/api/stocks",
        get(|| async { Json(json!([stock_json("ITUB4", true), stock_json("BBAS3", false)])) }),
    );
    let base = common::spawn(app).await;
    let mut state = StockListState::default();

    load_stock_list(&client(&base), &MountGuard::new(), &mut state).await;
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.stocks.len(), 2);
    assert_eq!(state.below_ceiling_count(), 1);
}

#[tokio::test]
async fn non_array_payload_empties_the_list_with_message() {
    let app = Router::new().route("/api/stocks", get(|| async { Json(json!({"stocks": []})) }));
    let base = common::spawn(app).await;
    let mut state = StockListState {
        stocks: Vec::new(),
        loading: false,
        error: None,
    };

    load_stock_list(&client(&base), &MountGuard::new(), &mut state).await;
    assert!(state.stocks.is_empty());
    assert_eq!(state.error.as_deref(), Some(STOCKS_LOAD_ERROR));
    assert!(!state.loading);
}

#[tokio::test]
async fn server_error_sets_the_same_message() {
    let app = Router::new().route(
        "/api/stocks",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let base = common::spawn(app).await;
    let mut state = StockListState::default();

    load_stock_list(&client(&base), &MountGuard::new(), &mut state).await;
    assert_eq!(state.error.as_deref(), Some(STOCKS_LOAD_ERROR));
}

#[tokio::test]
async fn unmount_before_response_leaves_state_untouched() {
    let app = Router::new().route(
        "/api/stocks",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Json(json!([stock_json("ITUB4", true)]))
        }),
    );
    let base = common::spawn(app).await;
    let guard = MountGuard::new();
    let unmount = guard.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        unmount.unmount();
    });

    let mut state = StockListState::default();
    load_stock_list(&client(&base), &guard, &mut state).await;
    assert!(state.stocks.is_empty());
    assert_eq!(state.error, None);
    assert!(state.loading);
}

#[tokio::test]
async fn company_directory_honours_monitored_filter() {
    let app = Router::new()
        .route(
            "/api/stats",
            get(|| async {
                Json(json!({
                    "total_empresas": 2,
                    "empresas_ativas": 1,
                    "empresas_besst": 1,
                    "total_acoes": 3,
                    "total_dividendos": 40,
                    "database_size_mb": 1.5,
                    "ultima_sincronizacao": {
                        "created_at": "2025-01-01T00:00:00",
                        "status": "success"
                    }
                }))
            }),
        )
        .route(
            "/api/empresas",
            get(|Query(params): Query<std::collections::HashMap<String, String>>| async move {
                if params.get("apenas_monitoradas").map(String::as_str) == Some("true") {
                    Json(json!({"empresas": [{
                        "id": 1,
                        "cnpj": "60.872.504/0001-23",
                        "razao_social": "ITAU UNIBANCO HOLDING S.A.",
                        "situacao": "ATIVO",
                        "monitorar": true
                    }]}))
                } else {
                    Json(json!({"total": 0}))
                }
            }),
        );
    let base = common::spawn(app).await;
    let client = client(&base);
    let guard = MountGuard::new();

    let mut directory = CompanyDirectory::default();
    load_company_directory(&client, &guard, true, &mut directory).await;
    assert_eq!(directory.companies.len(), 1);
    assert!(directory.companies[0].monitorar);
    assert_eq!(directory.stats.as_ref().map(|s| s.total_dividendos), Some(40));
    assert!(!directory.loading);

    load_company_directory(&client, &guard, false, &mut directory).await;
    assert!(directory.companies.is_empty());
}

#[tokio::test]
async fn company_directory_errors_are_swallowed() {
    let base = common::spawn(Router::new()).await;
    let mut directory = CompanyDirectory::default();
    load_company_directory(&client(&base), &MountGuard::new(), false, &mut directory).await;
    assert!(directory.stats.is_none());
    assert!(directory.companies.is_empty());
    assert!(!directory.loading);
}

#[tokio::test]
async fn backend_serves_the_configured_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("stocks.json");
    std::fs::write(&snapshot, json!([stock_json("TAEE11", true)]).to_string()).unwrap();
    let state = AppState {
        store: Arc::new(FileConfigStore::new(dir.path().join("integrations"))),
        stocks_snapshot: Some(snapshot),
    };
    let base = common::spawn(besst_api::routes::router(state)).await;

    let stocks = client(&base).fetch_stocks().await.unwrap();
    assert_eq!(stocks.len(), 1);
    assert_eq!(stocks[0].ticker, "TAEE11");
    assert_eq!(stocks[0].company_name, "TAEE11 S.A.");
}
