//! Upstream client subsystem.
//!
//! # Data Flow
//! ```text
//! validated SearchQuery
//!     → news.rs (credential check, GET search, status mapping)
//!     → NewsPage | NewsError
//!
//! validated HttpCode
//!     → image.rs (HEAD/GET <base>/<code>)
//!     → ImageFound | ImageError
//! ```
//!
//! # Design Decisions
//! - One upstream call per inbound request, no retries
//! - Each client owns a reqwest::Client with an explicit timeout
//! - Transport failures never masquerade as upstream statuses

pub mod image;
pub mod news;
pub mod types;

pub use image::{ImageClient, ImageError};
pub use news::{NewsClient, NewsError, UpstreamBuildError};
pub use types::{Article, ImageFound, NewsPage};
