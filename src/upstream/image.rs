//! Image-by-status-code upstream client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::{CheckMethod, ImageConfig};
use crate::observability::metrics;
use crate::upstream::news::UpstreamBuildError;
use crate::upstream::types::ImageFound;
use crate::validation::HttpCode;

/// The upstream has no image for the requested code, or could not be asked.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Imagen no encontrada para este código HTTP")]
    NotFound {
        code: HttpCode,
        /// Upstream status when one was received.
        status: Option<StatusCode>,
    },
}

#[derive(Clone)]
pub struct ImageClient {
    http: Client,
    base_url: String,
    method: CheckMethod,
}

impl ImageClient {
    pub fn new(config: &ImageConfig, timeout: Duration) -> Result<Self, UpstreamBuildError> {
        url::Url::parse(&config.base_url).map_err(|source| UpstreamBuildError::Url {
            url: config.base_url.clone(),
            source,
        })?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            method: config.check_method,
        })
    }

    /// Public URL of the image for `code`.
    pub fn image_url(&self, code: HttpCode) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Ask the upstream whether an image exists for `code`.
    ///
    /// Exactly one request is issued per call.
    pub async fn check_image(&self, code: HttpCode) -> Result<ImageFound, ImageError> {
        let image_url = self.image_url(code);
        let request = match self.method {
            CheckMethod::Head => self.http.head(&image_url),
            CheckMethod::Get => self.http.get(&image_url),
        };

        match request.send().await {
            Ok(res) if res.status().is_success() => {
                metrics::record_upstream_call("image", "ok");
                tracing::debug!(code = %code, "image found");
                Ok(ImageFound { code, image_url })
            }
            Ok(res) => {
                metrics::record_upstream_call("image", "not_found");
                tracing::info!(code = %code, status = %res.status(), "image upstream has no image");
                Err(ImageError::NotFound {
                    code,
                    status: Some(res.status()),
                })
            }
            Err(e) => {
                metrics::record_upstream_call("image", "transport");
                tracing::warn!(code = %code, error = %e, "image upstream unreachable");
                Err(ImageError::NotFound { code, status: None })
            }
        }
    }
}
