//! Server infrastructure module.
//!
//! - Router assembly with OpenAPI document, tracing, CORS and compression
//! - Liveness endpoint
//! - Graceful shutdown on SIGINT/SIGTERM

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{OPENAPI_PATH, create_app, create_router};
pub use health::{HealthResponse, health_router};
pub use shutdown::shutdown_signal;
