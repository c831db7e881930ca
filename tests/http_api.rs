//! HTTP surface tests: the router served on an ephemeral port, exercised
//! with a real client against a mocked generation provider.

use std::net::SocketAddr;
use std::sync::Arc;

use fiscal_gateway::cache::{MemoryCache, ResponseCache};
use fiscal_gateway::provider::{GenerationInvoker, ProfileTable};
use fiscal_gateway::{Gateway, server};

const ANSWER_BODY: &str = r#"{
    "choices": [{"message": {"content": "El IVA trimestral se declara con el modelo 303."}, "finish_reason": "stop"}],
    "usage": {"prompt_tokens": 42, "completion_tokens": 18, "total_tokens": 60}
}"#;

async fn spawn_gateway(provider_url: &str) -> SocketAddr {
    let cache = ResponseCache::new(Box::new(MemoryCache::new(64)));
    let invoker =
        GenerationInvoker::new(provider_url, "test-key", ProfileTable::default()).unwrap();
    let gateway: Arc<Gateway> = Gateway::new(cache, None, invoker);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(gateway)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_health_endpoint_reports_running() {
    let provider = mockito::Server::new_async().await;
    let addr = spawn_gateway(&provider.url()).await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn test_ask_roundtrip_and_metrics_endpoint() {
    let mut provider = mockito::Server::new_async().await;
    let _mock = provider
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ANSWER_BODY)
        .expect(1)
        .create_async()
        .await;

    let addr = spawn_gateway(&provider.url()).await;
    let client = reqwest::Client::new();

    let first: serde_json::Value = client
        .post(format!("http://{addr}/ask"))
        .json(&serde_json::json!({ "query": "¿Cómo declaro el IVA trimestral?", "mode": "standard" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["cached"], false);
    assert_eq!(first["mode"], "standard");
    assert_eq!(first["tokens_used"], 60);

    let second: serde_json::Value = client
        .post(format!("http://{addr}/ask"))
        .json(&serde_json::json!({ "query": "¿Cómo declaro el IVA trimestral?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["cached"], true);
    assert_eq!(second["answer"], first["answer"]);
    assert!(second.get("tokens_used").is_none());

    let metrics: serde_json::Value = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(metrics["total_requests"], 2);
    assert_eq!(metrics["cache_hits"], 1);
    assert_eq!(metrics["cache_misses"], 1);
    assert_eq!(metrics["tokens_used"], 60);
}

#[tokio::test]
async fn test_empty_query_is_a_client_error() {
    let mut provider = mockito::Server::new_async().await;
    let mock = provider
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let addr = spawn_gateway(&provider.url()).await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/ask"))
        .json(&serde_json::json!({ "query": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_provider_failure_maps_to_bad_gateway() {
    let mut provider = mockito::Server::new_async().await;
    let _mock = provider
        .mock("POST", "/chat/completions")
        .with_status(401)
        .create_async()
        .await;

    let addr = spawn_gateway(&provider.url()).await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/ask"))
        .json(&serde_json::json!({ "query": "¿Qué es el IRPF?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: serde_json::Value = resp.json().await.unwrap();
    // generic indication only, no provider detail
    assert_eq!(body["error"], "generation provider failed");
}
