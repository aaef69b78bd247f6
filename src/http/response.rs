//! Response composition.
//!
//! # Responsibilities
//! - Wrap handler results in the success envelope (`success: true` + fields)
//! - Map every domain error to a status code and the error envelope
//! - Mark internal failures so the error boundary can attach the request path
//!
//! # Design Decisions
//! - This is the only place response bodies are shaped; handlers return
//!   `Success<T>` or `ApiError`, never ad-hoc JSON
//! - Upstream errors are mapped, never passed through raw
//! - Internal details are logged, never sent to the client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::{ImageError, NewsError};
use crate::validation::ValidationError;

/// Example requests shown with client errors.
pub const NEWS_EXAMPLE: &str = "/news?q=tecnologia";
pub const HTTPCAT_EXAMPLE: &str = "/httpcat/404";

/// Routes suggested when a path does not exist.
pub const SUGGESTIONS: [&str; 4] = ["/health", NEWS_EXAMPLE, HTTPCAT_EXAMPLE, "/api"];

/// Message sent in place of any internal error detail.
pub const SANITIZED_MESSAGE: &str = "Ocurrió un error inesperado al procesar la solicitud";

/// Success envelope: `{"success": true, ...body}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(body: T) -> Self {
        Self { success: true, body }
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Machine-checkable error code: our own identifiers or the upstream's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Text(String),
    Status(u16),
}

/// Error envelope. Only `error` is always present.
#[derive(Debug, Default, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ejemplo: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metodo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugerencias: Option<Vec<&'static str>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }

    /// 404 body for a path no route handles.
    pub fn not_found(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            metodo: Some(method.into()),
            sugerencias: Some(SUGGESTIONS.to_vec()),
            ..Self::new("Endpoint no encontrado")
        }
    }

    /// 500 body for a failure that reached the error boundary.
    pub fn internal(path: impl Into<String>) -> Self {
        Self {
            mensaje: Some(SANITIZED_MESSAGE.to_string()),
            path: Some(path.into()),
            ..Self::new("Error interno del servidor")
        }
    }

    /// Body for a request that outlived `timeouts.request_secs`.
    pub fn timeout(path: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Text("requestTimeout".to_string())),
            mensaje: Some("El servidor tardó demasiado en responder".to_string()),
            path: Some(path.into()),
            ..Self::new("Tiempo de espera agotado")
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Marker left on responses the error boundary must rewrite with the path.
#[derive(Debug, Clone, Copy)]
pub struct InternalFailure;

/// Every way a handler can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    News(#[from] NewsError),

    #[error(transparent)]
    Image(#[from] ImageError),

    /// Unexpected failure. The message is logged, not sent.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::News(err) => match err {
                NewsError::CredentialMissing => StatusCode::INTERNAL_SERVER_ERROR,
                NewsError::InvalidCredential { .. } => StatusCode::UNAUTHORIZED,
                NewsError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                NewsError::PlanLimited { .. } => StatusCode::UPGRADE_REQUIRED,
                NewsError::Upstream { .. } | NewsError::Transport(_) | NewsError::Decode(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            ApiError::Image(ImageError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the error envelope for this error.
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation(err) => ErrorBody {
                code: Some(ErrorCode::Text(err.code().to_string())),
                ejemplo: Some(match err {
                    ValidationError::EmptyQuery => NEWS_EXAMPLE,
                    _ => HTTPCAT_EXAMPLE,
                }),
                ..ErrorBody::new(err.to_string())
            },
            ApiError::News(err) => news_error_body(err),
            ApiError::Image(err) => ErrorBody {
                code: Some(ErrorCode::Text("imageNotFound".to_string())),
                ..ErrorBody::new(err.to_string())
            },
            ApiError::Internal(_) => ErrorBody::new("Error interno del servidor"),
        }
    }
}

fn news_error_body(err: &NewsError) -> ErrorBody {
    let upstream_code = |code: &Option<String>, status: StatusCode| {
        Some(match code {
            Some(code) => ErrorCode::Text(code.clone()),
            None => ErrorCode::Status(status.as_u16()),
        })
    };

    match err {
        NewsError::CredentialMissing => ErrorBody {
            code: Some(ErrorCode::Text("credentialMissing".to_string())),
            mensaje: Some(err.to_string()),
            hint: Some("Configura la variable de entorno NEWS_API_KEY"),
            ..ErrorBody::new("Configuración incompleta")
        },
        NewsError::InvalidCredential { code } => ErrorBody {
            code: upstream_code(code, StatusCode::UNAUTHORIZED),
            ..ErrorBody::new(err.to_string())
        },
        NewsError::RateLimited { code } => ErrorBody {
            code: upstream_code(code, StatusCode::TOO_MANY_REQUESTS),
            ..ErrorBody::new(err.to_string())
        },
        NewsError::PlanLimited { code } => ErrorBody {
            code: upstream_code(code, StatusCode::UPGRADE_REQUIRED),
            ..ErrorBody::new(err.to_string())
        },
        NewsError::Upstream { status, code, .. } => ErrorBody {
            code: upstream_code(code, *status),
            ..ErrorBody::new(err.to_string())
        },
        NewsError::Transport(_) => ErrorBody {
            code: Some(ErrorCode::Text("transportFailure".to_string())),
            ..ErrorBody::new("Error al conectar con el servicio de noticias")
        },
        NewsError::Decode(_) => ErrorBody {
            code: Some(ErrorCode::Text("upstreamDecode".to_string())),
            ..ErrorBody::new("Respuesta inválida del servicio de noticias")
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "request rejected");
        }

        let mut response = self.body().into_response_with(status);
        if matches!(self, ApiError::Internal(_)) {
            response.extensions_mut().insert(InternalFailure);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn to_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_success_envelope_flattens_body() {
        #[derive(Serialize)]
        struct Body {
            code: u16,
        }
        assert_eq!(
            to_json(&Success::new(Body { code: 404 })),
            json!({ "success": true, "code": 404 })
        );
    }

    #[test]
    fn test_validation_errors_are_400_with_example() {
        let err = ApiError::from(ValidationError::EmptyQuery);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            to_json(&err.body()),
            json!({
                "error": "El parámetro 'q' es obligatorio.",
                "code": "emptyQuery",
                "ejemplo": "/news?q=tecnologia"
            })
        );

        let err = ApiError::from(ValidationError::OutOfRange { value: 700 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().ejemplo, Some(HTTPCAT_EXAMPLE));
    }

    #[test]
    fn test_news_error_statuses() {
        let cases = [
            (NewsError::CredentialMissing, StatusCode::INTERNAL_SERVER_ERROR),
            (NewsError::InvalidCredential { code: None }, StatusCode::UNAUTHORIZED),
            (NewsError::RateLimited { code: None }, StatusCode::TOO_MANY_REQUESTS),
            (NewsError::PlanLimited { code: None }, StatusCode::UPGRADE_REQUIRED),
            (
                NewsError::Upstream {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: None,
                    message: None,
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                NewsError::Upstream {
                    status: StatusCode::NOT_FOUND,
                    code: None,
                    message: None,
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_upstream_code_falls_back_to_status() {
        let body = ApiError::from(NewsError::RateLimited { code: None }).body();
        assert_eq!(body.code, Some(ErrorCode::Status(429)));

        let body = ApiError::from(NewsError::InvalidCredential {
            code: Some("apiKeyInvalid".into()),
        })
        .body();
        assert_eq!(body.code, Some(ErrorCode::Text("apiKeyInvalid".into())));
    }

    #[test]
    fn test_decode_failure_is_not_a_transport_failure() {
        let err = serde_json::from_str::<u64>("nope").unwrap_err();
        let err = ApiError::from(NewsError::Decode(err));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        let body = to_json(&err.body());
        assert_eq!(body["code"], "upstreamDecode");
        assert_eq!(body["error"], "Respuesta inválida del servicio de noticias");
    }

    #[test]
    fn test_credential_missing_body() {
        let body = to_json(&ApiError::from(NewsError::CredentialMissing).body());
        assert_eq!(body["error"], "Configuración incompleta");
        assert_eq!(body["code"], "credentialMissing");
        assert_eq!(body["mensaje"], "NEWS_API_KEY no está configurada en el servidor");
    }

    #[test]
    fn test_not_found_body() {
        assert_eq!(
            to_json(&ErrorBody::not_found("/doesnotexist", "GET")),
            json!({
                "error": "Endpoint no encontrado",
                "path": "/doesnotexist",
                "metodo": "GET",
                "sugerencias": ["/health", "/news?q=tecnologia", "/httpcat/404", "/api"]
            })
        );
    }

    #[test]
    fn test_internal_error_is_marked_and_sanitized() {
        let response = ApiError::Internal("db password=hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalFailure>().is_some());
    }
}
