//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, CORS, error boundary, metrics)
//! - Serve static front-end assets behind the API routes
//! - Bind server to listener and shut down gracefully

use axum::{
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::{AppConfig, CorsConfig};
use crate::http::boundary::{error_boundary, handle_panic, not_found, request_timeout};
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown::signalled;
use crate::observability::metrics;
use crate::upstream::{ImageClient, NewsClient, UpstreamBuildError};

/// Application state injected into handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub news: NewsClient,
    pub images: ImageClient,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Self, UpstreamBuildError> {
        let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);
        let news = NewsClient::new(&config.news, upstream_timeout)?;
        let images = ImageClient::new(&config.image, upstream_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            news,
            images,
        })
    }
}

/// HTTP server for the backend.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, UpstreamBuildError> {
        let state = AppState::from_config(config)?;
        let config = state.config.clone();
        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                signalled(shutdown).await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let routes = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/news", get(handlers::search_news))
        .route("/httpcat", get(handlers::image_by_query))
        .route("/httpcat/{code}", get(handlers::image_by_code))
        .route("/api", get(handlers::docs))
        .method_not_allowed_fallback(not_found);

    let routes = match &config.assets.static_dir {
        Some(dir) => routes.fallback_service(
            ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(not_found.into_service()),
        ),
        None => routes.fallback(not_found),
    };

    routes
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(error_boundary))
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(middleware::from_fn_with_state(
            Duration::from_secs(config.timeouts.request_secs),
            request_timeout,
        ))
        .layer(cors_layer(&config.cors))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(set_request_id_layer())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
