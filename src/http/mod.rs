//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, tracing span)
//!     → handlers.rs (validate → upstream call)
//!     → response.rs (success / error envelope)
//!     → boundary.rs (404 catch-all, panics, internal failures)
//!     → Send to client
//! ```

pub mod assets;
pub mod boundary;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorBody, Success};
pub use server::{build_router, AppState, HttpServer};
