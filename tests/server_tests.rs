mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_and_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn_backend(dir.path()).await;
    let client = reqwest::Client::new();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "ok");

    let catalog: Value = client
        .get(format!("{base}/api/admin/integrations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let keys: Vec<&str> = catalog["providers"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["key"].as_str())
        .collect();
    assert_eq!(keys, ["brapi", "fintz", "hgbrasil", "cvm", "b3"]);
}

#[tokio::test]
async fn get_returns_defaults_until_something_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn_backend(dir.path()).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/api/admin/integrations/b3");

    let defaults: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(defaults["dataSource"], "api");
    assert_eq!(defaults["ftpHost"], "ftp.b3.com.br");

    let saved = json!({"enabled": true, "dataSource": "ftp"});
    let response: Value = client
        .post(&url)
        .json(&saved)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response, json!({"ok": true}));

    let stored: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(stored, saved);
}

#[tokio::test]
async fn unknown_provider_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn_backend(dir.path()).await;
    let client = reqwest::Client::new();

    let get = client
        .get(format!("{base}/api/admin/integrations/yahoo"))
        .send()
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let post = client
        .post(format!("{base}/api/admin/integrations/yahoo"))
        .json(&json!({"enabled": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(post.status(), StatusCode::NOT_FOUND);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn non_object_documents_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn_backend(dir.path()).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/admin/integrations/fintz"))
        .json(&json!([1, 2, 3]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stocks_default_to_an_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn_backend(dir.path()).await;
    let stocks: Value = reqwest::get(format!("{base}/api/stocks"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stocks, json!([]));
}
