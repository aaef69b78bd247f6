//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the backend.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::validation::CodeFormat;

/// Root configuration for the backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment profile reported by `/health`.
    pub profile: Profile,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Startup behaviour.
    pub startup: StartupConfig,

    /// News-search upstream.
    pub news: NewsConfig,

    /// Image-by-status-code upstream.
    pub image: ImageConfig,

    /// Inbound parameter validation.
    pub validation: ValidationConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Front-end asset resolution.
    pub assets: AssetsConfig,

    /// Cross-origin settings for the browser front-end.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Deployment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            other => Err(format!("unknown profile '{other}'")),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Startup configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StartupConfig {
    /// Refuse to start when the news credential is missing.
    pub strict: bool,
}

/// API key for the news upstream.
///
/// Redacted in `Debug`; only the first 8 characters are ever logged.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key. Blank keys count as unconfigured.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short prefix safe to print in the startup banner.
    pub fn preview(&self) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// News-search upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Search endpoint URL.
    pub base_url: String,

    /// API key. Usually supplied through `NEWS_API_KEY` rather than the file.
    #[serde(skip_serializing)]
    pub api_key: Option<Credential>,

    /// Language filter sent with every search.
    pub language: String,

    /// Maximum articles per search (5 and 10 are the usual profiles).
    pub page_size: u32,

    /// User-Agent header sent to the upstream.
    pub user_agent: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2/everything".to_string(),
            api_key: None,
            language: "es".to_string(),
            page_size: 10,
            user_agent: "NewsApp/1.0".to_string(),
        }
    }
}

/// HTTP method used for the image existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMethod {
    Head,
    #[default]
    Get,
}

/// Image upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Base URL; images live at `<base_url>/<code>`.
    pub base_url: String,

    /// Method used to probe for an image.
    pub check_method: CheckMethod,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://http.cat".to_string(),
            check_method: CheckMethod::Get,
        }
    }
}

/// Inbound validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// Status code parsing strictness.
    pub code_format: CodeFormat,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Timeout for a single upstream call in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Front-end asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Ordered candidate locations for the landing page; first existing wins.
    pub index_candidates: Vec<PathBuf>,

    /// Directory served for unmatched GET requests (scripts, styles).
    pub static_dir: Option<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            index_candidates: vec![
                PathBuf::from("index.html"),
                PathBuf::from("../index.html"),
                PathBuf::from("public/index.html"),
            ],
            static_dir: None,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.news.page_size, 10);
        assert_eq!(config.news.language, "es");
        assert_eq!(config.timeouts.upstream_secs, 10);
        assert_eq!(config.validation.code_format, CodeFormat::ThreeDigits);
        assert_eq!(config.profile, Profile::Development);
        assert!(config.news.api_key.is_none());
        assert!(!config.startup.strict);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            profile = "production"

            [news]
            page_size = 5
            api_key = "abcdef123456"

            [validation]
            code_format = "numeric"

            [image]
            check_method = "head"
            "#,
        )
        .unwrap();
        assert_eq!(config.profile, Profile::Production);
        assert_eq!(config.news.page_size, 5);
        assert_eq!(config.news.base_url, "https://newsapi.org/v2/everything");
        assert_eq!(config.news.api_key.as_ref().map(Credential::expose), Some("abcdef123456"));
        assert_eq!(config.validation.code_format, CodeFormat::Numeric);
        assert_eq!(config.image.check_method, CheckMethod::Head);
    }

    #[test]
    fn test_credential_is_redacted() {
        let cred = Credential::new("supersecretkey").unwrap();
        assert_eq!(format!("{cred:?}"), "Credential(<redacted>)");
        assert_eq!(cred.preview(), "supersec...");
        assert!(Credential::new("   ").is_none());

        let mut config = AppConfig::default();
        config.news.api_key = Some(cred);
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("supersecretkey"));
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("PRODUCTION".parse::<Profile>(), Ok(Profile::Production));
        assert_eq!("dev".parse::<Profile>(), Ok(Profile::Development));
        assert!("staging".parse::<Profile>().is_err());
    }
}
