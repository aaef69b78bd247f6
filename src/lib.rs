//! News and HTTP-cat proxy backend library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;
pub mod validation;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
