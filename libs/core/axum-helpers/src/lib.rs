//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health endpoint, graceful shutdown
//! - **[`http`]**: CORS configuration
//! - **[`errors`]**: Structured error responses with error codes
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::{create_app, create_router, cors_layer_from_env, health_router};
//! use core_config::{app_info, server::ServerConfig, Environment};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! let environment = Environment::from_env();
//! let router = create_router::<ApiDoc>(Router::new(), cors_layer_from_env(&environment)?)
//!     .merge(health_router(app_info!()));
//! create_app(router, &ServerConfig::default()).await?;
//! ```

pub mod errors;
pub mod http;
pub mod server;

pub use server::{
    HealthResponse, OPENAPI_PATH, create_app, create_router, health_router, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, create_permissive_cors_layer};

pub use errors::{AppError, ErrorCode, ErrorResponse};
