//! Startup orchestration.
//!
//! # Responsibilities
//! - Check the news credential against the strict-startup setting
//! - Log the startup banner
//!
//! # Design Decisions
//! - Strict startup: a missing credential is fatal
//! - Lenient startup: warn and continue; `/news` answers `CredentialMissing`

use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("NEWS_API_KEY is not configured and startup.strict is enabled")]
    CredentialMissing,
}

/// Validate runtime prerequisites before binding the listener.
pub fn preflight(config: &AppConfig) -> Result<(), StartupError> {
    match &config.news.api_key {
        Some(key) => {
            tracing::info!(api_key = %key.preview(), "NewsAPI key configured");
            Ok(())
        }
        None if config.startup.strict => {
            tracing::error!("NEWS_API_KEY is not configured; refusing to start");
            Err(StartupError::CredentialMissing)
        }
        None => {
            tracing::warn!(
                "NEWS_API_KEY is not configured; /news will answer 500 until it is set \
                 (copy .env.example to .env and add NEWS_API_KEY=<key>)"
            );
            Ok(())
        }
    }
}

/// Log where everything is reachable.
pub fn log_banner(config: &AppConfig, bound: std::net::SocketAddr) {
    tracing::info!(
        environment = %config.profile,
        address = %bound,
        page_size = config.news.page_size,
        code_format = ?config.validation.code_format,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Backend ready: /health, /news?q=tecnologia, /httpcat/404, /api"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credential;

    #[test]
    fn test_strict_startup_requires_credential() {
        let mut config = AppConfig::default();
        config.startup.strict = true;
        assert!(matches!(preflight(&config), Err(StartupError::CredentialMissing)));

        config.news.api_key = Credential::new("key");
        assert!(preflight(&config).is_ok());
    }

    #[test]
    fn test_lenient_startup_continues() {
        let config = AppConfig::default();
        assert!(preflight(&config).is_ok());
    }
}
