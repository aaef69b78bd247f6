//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (dotenvy, optional)
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, overlay NEWS_API_KEY / PORT / APP_ENV)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the credential never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    AppConfig, AssetsConfig, CheckMethod, CorsConfig, Credential, ImageConfig, ListenerConfig,
    LogFormat, NewsConfig, ObservabilityConfig, Profile, StartupConfig, TimeoutConfig,
    ValidationConfig,
};
