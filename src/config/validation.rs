//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page size, addresses)
//! - Check upstream URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// Largest page size the news upstream accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("news.page_size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    PageSize(u32),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.upstream_secs ({upstream}) must be below timeouts.request_secs ({request})")]
    TimeoutOrder { upstream: u64, request: u64 },

    #[error("news.language must not be empty")]
    EmptyLanguage,
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (field, value) in [
        ("news.base_url", &config.news.base_url),
        ("image.base_url", &config.image.base_url),
    ] {
        if Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if config.news.page_size == 0 || config.news.page_size > MAX_PAGE_SIZE {
        errors.push(ValidationError::PageSize(config.news.page_size));
    }

    if config.news.language.trim().is_empty() {
        errors.push(ValidationError::EmptyLanguage);
    }

    let timeouts = &config.timeouts;
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.upstream_secs"));
    }
    if timeouts.request_secs > 0 && timeouts.upstream_secs >= timeouts.request_secs {
        errors.push(ValidationError::TimeoutOrder {
            upstream: timeouts.upstream_secs,
            request: timeouts.request_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
