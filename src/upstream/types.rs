//! Payloads exchanged with the upstream services.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::HttpCode;

/// A single news article, kept exactly as the upstream sent it.
///
/// Upstream articles routinely carry `null` or missing fields, so nothing is
/// required here; the accessors read the well-known fields when present.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Article(Value);

impl Article {
    fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    /// `source.name`.
    pub fn source_name(&self) -> Option<&str> {
        self.0.get("source")?.get("name")?.as_str()
    }

    pub fn published_at(&self) -> Option<&str> {
        self.text("publishedAt")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    pub fn url(&self) -> Option<&str> {
        self.text("url")
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

/// Successful search response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Error body the news upstream returns alongside non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewsErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Confirmation that an image exists for a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFound {
    pub code: HttpCode,
    pub image_url: String,
}
