use axum::http::{HeaderValue, Method};
use core_config::Environment;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Environment variable holding the comma-separated list of allowed origins.
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Creates a CORS layer restricted to the given origins.
///
/// Allows GET, POST and OPTIONS with the headers browsers send for JSON
/// requests, credentials, and a 1 hour preflight cache.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::ORIGIN,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::CONTENT_LENGTH,
            axum::http::header::ACCEPT_ENCODING,
            axum::http::header::AUTHORIZATION,
        ])
        .expose_headers([axum::http::header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Creates a permissive CORS layer for development.
///
/// Allows any origin - **DO NOT USE IN PRODUCTION**.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Parse a comma-separated origin list, skipping blank entries.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {} value: {}", CORS_ALLOWED_ORIGIN, e),
            )
        })
}

/// Builds the CORS layer for the given environment.
///
/// `CORS_ALLOWED_ORIGIN` wins when set. Without it, development falls back to
/// a permissive layer and production refuses to start.
pub fn cors_layer_from_env(environment: &Environment) -> io::Result<CorsLayer> {
    match std::env::var(CORS_ALLOWED_ORIGIN) {
        Ok(raw) => {
            let origins = parse_allowed_origins(&raw)?;
            if origins.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} cannot be empty", CORS_ALLOWED_ORIGIN),
                ));
            }
            info!(origins = %raw, "CORS configured with allowed origins");
            Ok(create_cors_layer(origins))
        }
        Err(_) if environment.is_development() => {
            warn!("{} not set, allowing any origin in development", CORS_ALLOWED_ORIGIN);
            Ok(create_permissive_cors_layer())
        }
        Err(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} environment variable is required in production. Example: {}=https://shop.example.com",
                CORS_ALLOWED_ORIGIN, CORS_ALLOWED_ORIGIN
            ),
        )),
    }
}
