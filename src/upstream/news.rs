//! News-search upstream client.
//!
//! # Responsibilities
//! - Refuse to call the upstream when no credential is configured
//! - Build the search request (query, language, page size, credential)
//! - Separate transport failures from upstream HTTP errors
//! - Translate upstream statuses into [`NewsError`] variants

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::{Credential, NewsConfig};
use crate::observability::metrics;
use crate::upstream::types::{NewsErrorBody, NewsPage};
use crate::validation::SearchQuery;

/// Message used when the upstream gives no explanation of its own.
pub const DEFAULT_UPSTREAM_MESSAGE: &str = "Error al obtener noticias";

/// Errors produced while searching for news.
#[derive(Debug, Error)]
pub enum NewsError {
    /// No API key configured; checked before any network I/O.
    #[error("NEWS_API_KEY no está configurada en el servidor")]
    CredentialMissing,

    /// Upstream answered 401.
    #[error("API Key inválida o expirada. Verifica tu configuración")]
    InvalidCredential { code: Option<String> },

    /// Upstream answered 429.
    #[error("Límite de solicitudes excedido. Intenta más tarde.")]
    RateLimited { code: Option<String> },

    /// Upstream answered 426.
    #[error("Plan gratuito de NewsAPI limitado. Actualiza tu cuenta.")]
    PlanLimited { code: Option<String> },

    /// Any other non-2xx answer.
    #[error("{}", .message.as_deref().unwrap_or(DEFAULT_UPSTREAM_MESSAGE))]
    Upstream {
        status: StatusCode,
        code: Option<String>,
        message: Option<String>,
    },

    /// DNS, connect, timeout or body read failure.
    #[error("news transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// 2xx answer whose body is not a search result.
    #[error("news response decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

impl NewsError {
    /// Map a non-2xx upstream status and its (optional) error body.
    pub fn from_status(status: StatusCode, code: Option<String>, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => NewsError::InvalidCredential { code },
            StatusCode::TOO_MANY_REQUESTS => NewsError::RateLimited { code },
            StatusCode::UPGRADE_REQUIRED => NewsError::PlanLimited { code },
            _ => NewsError::Upstream { status, code, message },
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            NewsError::CredentialMissing => "credential_missing",
            NewsError::Transport(_) => "transport",
            NewsError::Decode(_) => "decode",
            _ => "upstream_error",
        }
    }
}

/// Thin wrapper around reqwest for news-search calls.
#[derive(Clone)]
pub struct NewsClient {
    http: Client,
    base_url: Url,
    api_key: Option<Credential>,
    language: String,
    page_size: u32,
}

impl NewsClient {
    /// Build a client with an explicit per-call timeout.
    pub fn new(config: &NewsConfig, timeout: Duration) -> Result<Self, UpstreamBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| UpstreamBuildError::Url {
            url: config.base_url.clone(),
            source,
        })?;
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            page_size: config.page_size,
        })
    }

    /// Whether a credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Compose the upstream search URL for `query`.
    pub fn search_url(&self, query: &SearchQuery, api_key: &Credential) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query.as_str())
            .append_pair("language", &self.language)
            .append_pair("pageSize", &self.page_size.to_string())
            .append_pair("apiKey", api_key.expose());
        url
    }

    /// Search the upstream for `query`.
    pub async fn fetch_news(&self, query: &SearchQuery) -> Result<NewsPage, NewsError> {
        let result = self.fetch_news_inner(query).await;
        metrics::record_upstream_call(
            "news",
            result.as_ref().map(|_| "ok").unwrap_or_else(NewsError::outcome),
        );
        result
    }

    async fn fetch_news_inner(&self, query: &SearchQuery) -> Result<NewsPage, NewsError> {
        let api_key = self.api_key.as_ref().ok_or(NewsError::CredentialMissing)?;
        let url = self.search_url(query, api_key);

        tracing::debug!(query = %query, "searching news upstream");

        let res = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(NewsError::Transport)?;
        let status = res.status();
        let body = res.bytes().await.map_err(NewsError::Transport)?;

        // Keep upstream code/message so handlers can report them.
        if !status.is_success() {
            let payload: NewsErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            tracing::warn!(
                status = %status,
                code = ?payload.code,
                message = ?payload.message,
                "news upstream returned an error"
            );
            return Err(NewsError::from_status(status, payload.code, payload.message));
        }

        let page: NewsPage = serde_json::from_slice(&body).map_err(NewsError::Decode)?;
        tracing::info!(query = %query, total_results = page.total_results, "news found");
        Ok(page)
    }
}

/// Failure to construct an upstream client at startup.
#[derive(Debug, Error)]
pub enum UpstreamBuildError {
    #[error("invalid upstream URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
