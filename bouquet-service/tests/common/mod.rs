#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bouquet_service::config::BouquetConfig;
use bouquet_service::services::providers::{AssetStore, ImageProvider};
use bouquet_service::AppState;
use http_body_util::BodyExt;
use service_core::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "sk-test";
pub const TEST_IMAGE_B64: &str = "aGVsbG8gYm91cXVldA==";

/// Build a config from explicit variables, never from the process environment.
pub fn config_with(vars: &[(&str, &str)]) -> BouquetConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    BouquetConfig::from_lookup(Config { port: 0 }, |key| vars.get(key).cloned())
}

/// State backed by the given providers instead of the real HTTP clients.
pub fn state_with(
    image_provider: Option<Arc<dyn ImageProvider>>,
    asset_store: Option<Arc<dyn AssetStore>>,
) -> AppState {
    AppState {
        config: Arc::new(config_with(&[])),
        image_provider,
        asset_store,
    }
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec();

    (status, headers, body)
}

pub async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;

    (status, serde_json::from_slice(&body).expect("response should be JSON"))
}

pub async fn post_raw(router: Router, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await;

    (status, serde_json::from_slice(&body).expect("response should be JSON"))
}

pub async fn post_generate(router: Router, payload: serde_json::Value) -> (StatusCode, serde_json::Value) {
    post_raw(router, payload.to_string()).await
}
