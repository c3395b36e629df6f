#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use shortlink::config::{Config, StoreBackend};
use shortlink::domain::repositories::{MappingRepository, StatsRepository};
use shortlink::infrastructure::Stores;
use shortlink::routes::router;
use shortlink::server::build_state;
use shortlink::state::AppState;
use std::net::SocketAddr;
use std::time::Duration;
use tower::Layer;

/// Peer address injected by [`MockConnectInfoLayer`].
pub const CLIENT_IP: &str = "127.0.0.1";

pub fn test_config() -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        domain: "localhost:3000".to_string(),
        api_quota: 10,
        quota_window_seconds: 1800,
        ..Config::default()
    }
}

/// State over fresh in-memory keyspaces, plus handles to inspect them.
pub fn create_test_state(config: &Config) -> (AppState, Stores) {
    let stores = Stores::memory();
    let state = build_state(config, stores.clone());
    (state, stores)
}

/// Full router with a fixed peer address.
pub fn test_app(state: AppState) -> Router {
    router(state).layer(MockConnectInfoLayer)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(test_app(state)).unwrap()
}

/// Seeds a mapping directly in the codes keyspace.
pub async fn create_test_link(stores: &Stores, code: &str, url: &str) {
    stores
        .mappings
        .put(code, url, Duration::from_secs(3600))
        .await
        .unwrap();
}

/// Waits for detached stats tasks to land.
pub async fn resolution_count(stores: &Stores, expected: i64) -> i64 {
    let mut count = 0;
    for _ in 0..50 {
        count = stores.stats.read("counter").await.unwrap();
        if count >= expected {
            break;
        }
        tokio::task::yield_now().await;
    }
    count
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = format!("{CLIENT_IP}:12345").parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
