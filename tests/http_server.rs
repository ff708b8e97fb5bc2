//! HTTP tool API tests against a live server on an ephemeral port.

mod common;

use gtfobins_mcp::server::build_router;
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_server(cfg: gtfobins_mcp::config::Config) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(Arc::new(cfg));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health_and_tool_list() {
    let (_tmp, cfg) = common::built_corpus();
    let base = spawn_server(cfg).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let list: Value = client
        .get(format!("{}/tools/list", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = list["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names.len(), 5);
    assert!(names.contains(&"query_binary"));
}

#[tokio::test]
async fn test_tool_calls() {
    let (_tmp, cfg) = common::built_corpus();
    let base = spawn_server(cfg).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/tools/query_binary", base))
        .json(&json!({ "binary_name": "awk" }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["result"]["functions"]["sudo"][0]["code"],
        "```bash\nsudo awk 'BEGIN {system(\"/bin/sh\")}'\n```"
    );

    let body: Value = client
        .post(format!("{}/tools/query_binary", base))
        .json(&json!({ "binary_name": "nope" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({ "result": { "Error": "Binary 'nope' not found in api.json." } })
    );

    let body: Value = client
        .post(format!("{}/tools/list_binaries", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["result"], json!(["awk", "base64", "find"]));
}

#[tokio::test]
async fn test_error_responses() {
    let (_tmp, cfg) = common::built_corpus();
    let base = spawn_server(cfg).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/tools/nonexistent", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");

    let resp = client
        .post(format!("{}/tools/query_function", base))
        .json(&json!({ "function_name": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}
