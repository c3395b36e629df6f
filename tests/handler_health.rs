mod common;

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use shortlink::api::handlers::health_handler;
use shortlink::domain::repositories::MappingRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::Stores;
use shortlink::server::build_state;
use std::sync::Arc;
use std::time::Duration;

/// Codes keyspace that is always unreachable.
struct DownMappings;

#[async_trait]
impl MappingRepository for DownMappings {
    async fn exists(&self, _code: &str) -> Result<bool, AppError> {
        Err(AppError::store("connection refused"))
    }

    async fn put(&self, _code: &str, _url: &str, _ttl: Duration) -> Result<(), AppError> {
        Err(AppError::store("connection refused"))
    }

    async fn put_if_absent(
        &self,
        _code: &str,
        _url: &str,
        _ttl: Duration,
    ) -> Result<bool, AppError> {
        Err(AppError::store("connection refused"))
    }

    async fn get(&self, _code: &str) -> Result<String, AppError> {
        Err(AppError::store("connection refused"))
    }

    async fn ttl(&self, _code: &str) -> Result<Option<Duration>, AppError> {
        Err(AppError::store("connection refused"))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

fn degraded_stores() -> Stores {
    Stores {
        mappings: Arc::new(DownMappings),
        ..Stores::memory()
    }
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _stores) = common::create_test_state(&common::test_config());
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["codes"]["status"], "ok");
    assert_eq!(json["checks"]["limits"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (state, _stores) = common::create_test_state(&common::test_config());
    let server = common::test_server(state);

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("codes").is_some());
    assert!(json["checks"].get("limits").is_some());
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let state = build_state(&common::test_config(), degraded_stores());
    let server = common::test_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["codes"]["status"], "error");
    assert_eq!(json["checks"]["limits"]["status"], "ok");
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let state = build_state(&common::test_config(), degraded_stores());
    let server = common::test_server(state);

    let response = server.get("/anything").await;

    assert_eq!(response.status_code(), 500);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "Unable to connect to server");
    assert_eq!(json["code"], "internal_error");
    assert!(!response.text().contains("connection refused"));
}
