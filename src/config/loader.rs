//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, Credential};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the news upstream credential.
pub const ENV_API_KEY: &str = "NEWS_API_KEY";
/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable selecting the deployment profile.
pub const ENV_PROFILE: &str = "APP_ENV";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, overlay the environment,
/// then validate.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with(path, |var| std::env::var(var).ok())
}

fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => parse_file(path)?,
        None => AppConfig::default(),
    };
    let config = apply_overrides(config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = toml::from_str(&content)?;
    // `api_key = ""` in a file means "not configured".
    config.news.api_key = config
        .news
        .api_key
        .take()
        .and_then(|key| Credential::new(key.expose()));
    Ok(config)
}

/// Apply environment overrides using `lookup` as the variable source.
pub fn apply_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        // An empty variable still overrides a key from the file.
        config.news.api_key = Credential::new(key);
    }

    if let Some(port) = lookup(ENV_PORT) {
        let port: u16 = port.trim().parse().map_err(|e| ConfigError::Env {
            var: ENV_PORT,
            reason: format!("{e}"),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }

    if let Some(profile) = lookup(ENV_PROFILE) {
        config.profile = profile
            .parse()
            .map_err(|reason| ConfigError::Env { var: ENV_PROFILE, reason })?;
    }

    Ok(config)
}
