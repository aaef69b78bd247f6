//! Route handlers.
//!
//! Each handler validates its input, makes at most one upstream call and
//! hands the result to the response composer.

use std::collections::HashMap;

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::Uri,
    response::{Html, IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::http::assets;
use crate::http::response::{ApiError, Success, HTTPCAT_EXAMPLE, NEWS_EXAMPLE};
use crate::http::server::AppState;
use crate::upstream::Article;
use crate::validation::{HttpCode, SearchQuery, ValidationError};

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBody {
    pub status: &'static str,
    pub mensaje: &'static str,
    pub api_key_configurada: bool,
    pub timestamp: String,
    pub environment: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Success<HealthBody> {
    Success::new(HealthBody {
        status: "ok",
        mensaje: "Servidor funcionando correctamente",
        api_key_configurada: state.news.has_credential(),
        timestamp: now_rfc3339(),
        environment: state.config.profile.as_str(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsBody {
    pub total_results: u64,
    pub articles: Vec<Article>,
    pub query: String,
}

#[tracing::instrument(name = "search_news", skip_all, fields(q = ?params.get("q")))]
pub async fn search_news(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Success<NewsBody>, ApiError> {
    let query = SearchQuery::from_param(params.get("q").map(String::as_str))?;
    let page = state.news.fetch_news(&query).await?;

    Ok(Success::new(NewsBody {
        total_results: page.total_results,
        articles: page.articles,
        query: query.into_inner(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    pub code: HttpCode,
    pub image_url: String,
    pub message: String,
}

async fn lookup_image(state: &AppState, raw: &str) -> Result<Success<ImageBody>, ApiError> {
    let code = HttpCode::parse(raw, state.config.validation.code_format)?;
    let found = state.images.check_image(code).await?;

    Ok(Success::new(ImageBody {
        code: found.code,
        image_url: found.image_url,
        message: format!("HTTP Status {}", found.code),
    }))
}

/// Path form: `/httpcat/404`.
///
/// A segment axum cannot decode (e.g. invalid UTF-8) is a format error, not a
/// framework rejection.
#[tracing::instrument(name = "image_by_code", skip_all, fields(path = %uri.path()))]
pub async fn image_by_code(
    State(state): State<AppState>,
    uri: Uri,
    code: Result<Path<String>, PathRejection>,
) -> Result<Success<ImageBody>, ApiError> {
    match code {
        Ok(Path(code)) => lookup_image(&state, &code).await,
        Err(rejection) => {
            let raw = uri.path().rsplit('/').next().unwrap_or_default();
            tracing::debug!(raw = %raw, rejection = %rejection, "undecodable status code segment");
            Err(ValidationError::InvalidFormat { raw: raw.to_string() }.into())
        }
    }
}

/// Query-parameter form: `/httpcat?code=404`.
pub async fn image_by_query(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Success<ImageBody>, ApiError> {
    let raw = params.get("code").map(String::as_str).unwrap_or_default();
    lookup_image(&state, raw).await
}

#[derive(Debug, Serialize)]
pub struct EndpointDoc {
    pub metodo: &'static str,
    pub ruta: &'static str,
    pub descripcion: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ejemplo: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: EndpointDoc,
    pub news: EndpointDoc,
    pub httpcat: EndpointDoc,
}

#[derive(Debug, Serialize)]
pub struct DocsBody {
    pub nombre: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
    pub status: &'static str,
    pub timestamp: String,
}

pub async fn docs() -> Success<DocsBody> {
    Success::new(DocsBody {
        nombre: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            health: EndpointDoc {
                metodo: "GET",
                ruta: "/health",
                descripcion: "Verificar estado del servidor",
                ejemplo: None,
            },
            news: EndpointDoc {
                metodo: "GET",
                ruta: "/news?q=termino",
                descripcion: "Buscar noticias por término",
                ejemplo: Some(NEWS_EXAMPLE),
            },
            httpcat: EndpointDoc {
                metodo: "GET",
                ruta: "/httpcat/:code",
                descripcion: "Obtener imagen HTTP Cat",
                ejemplo: Some(HTTPCAT_EXAMPLE),
            },
        },
        status: "online",
        timestamp: now_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct LandingBody {
    pub mensaje: &'static str,
    pub endpoints: [&'static str; 4],
    pub docs: &'static str,
}

/// `/`: the configured landing page, or a JSON summary when none exists.
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    if let Some(path) = assets::resolve_index(&state.config.assets.index_candidates).await {
        let html = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApiError::Internal(format!("failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "serving landing page");
        return Ok(Html(html).into_response());
    }

    Ok(Success::new(LandingBody {
        mensaje: "API Backend funcionando",
        endpoints: [
            "GET /health - Estado del servidor",
            "GET /api - Información de la API",
            "GET /news?q=termino - Buscar noticias",
            "GET /httpcat/:code - HTTP Cat",
        ],
        docs: "/api",
    })
    .into_response())
}
