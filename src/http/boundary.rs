//! Catch-all and global failure handling.
//!
//! # Responsibilities
//! - Answer unmatched paths (and unsupported methods) with a structured 404
//! - Turn handler panics into a sanitized 500
//! - Attach the request path to every internal failure response
//! - Bound the whole request by the configured timeout
//!
//! # Design Decisions
//! - Panic payloads and internal error text go to the log only
//! - The boundary rewrites only responses marked with [`InternalFailure`]

use std::any::Any;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};

use crate::http::response::{ErrorBody, InternalFailure};

/// Fallback for any path or method no route handles.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::warn!(method = %method, path = %uri.path(), "No route matched");
    ErrorBody::not_found(uri.path(), method.as_str()).into_response_with(StatusCode::NOT_FOUND)
}

/// `CatchPanicLayer` handler.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "handler panicked");

    let mut response = ErrorBody::new("Error interno del servidor")
        .into_response_with(StatusCode::INTERNAL_SERVER_ERROR);
    response.extensions_mut().insert(InternalFailure);
    response
}

/// Middleware rewriting internal failures into `{error, mensaje, path}`.
pub async fn error_boundary(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    if response.extensions().get::<InternalFailure>().is_some() {
        tracing::error!(path = %path, "unhandled failure reached the error boundary");
        return ErrorBody::internal(path).into_response_with(StatusCode::INTERNAL_SERVER_ERROR);
    }
    response
}

/// Middleware answering `504` with the error envelope once `limit` elapses.
///
/// Dropping the inner future cancels any upstream call still in flight.
pub async fn request_timeout(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, limit_secs = limit.as_secs(), "request timed out");
            ErrorBody::timeout(path).into_response_with(StatusCode::GATEWAY_TIMEOUT)
        }
    }
}
