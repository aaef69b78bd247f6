//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use newscat_proxy::config::{AppConfig, Credential};
use newscat_proxy::HttpServer;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// A programmable upstream recording every request it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(Method, Uri)>>>,
}

impl MockUpstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(Method, Uri)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

/// Start a mock upstream answering `f(method, uri) -> (status, json body)`.
pub async fn start_programmable_backend<F>(f: F) -> MockUpstream
where
    F: Fn(&Method, &Uri) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let handler = {
        let calls = calls.clone();
        let requests = requests.clone();
        move |method: Method, uri: Uri| {
            let calls = calls.clone();
            let requests = requests.clone();
            let f = f.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                requests.lock().unwrap().push((method.clone(), uri.clone()));
                let (status, body) = f(&method, &uri);
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response()
            }
        }
    };

    let app = Router::new().fallback(handler);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream {
        addr,
        calls,
        requests,
    }
}

/// Start a mock upstream that always answers `status` with `body`.
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_backend(move |_, _| (status, body.to_string())).await
}

/// Start a mock upstream that waits `delay` before answering 200 with `body`.
pub async fn start_slow_backend(delay: Duration, body: &'static str) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let handler = {
        let calls = calls.clone();
        move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                ([(header::CONTENT_TYPE, "application/json")], body)
            }
        }
    };

    let app = Router::new().fallback(handler);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream {
        addr,
        calls,
        requests,
    }
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing both upstreams at local mocks.
pub fn test_config(news_base: String, image_base: String, api_key: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.news.base_url = news_base;
    config.news.api_key = api_key.and_then(Credential::new);
    config.image.base_url = image_base;
    config.timeouts.upstream_secs = 2;
    config.timeouts.request_secs = 5;
    config.assets.index_candidates = Vec::new();
    config
}

pub fn router(config: AppConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

/// Send one request through the router and decode the JSON body.
pub async fn call(router: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = send(router, method, uri).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    call(router, Method::GET, uri).await
}

pub async fn send(router: &Router, method: Method, uri: &str) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}
