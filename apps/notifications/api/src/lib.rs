//! Order notification HTTP service.
//!
//! Serves `POST /api/v1/notify` backed by the SMTP mail transport.

use axum::Router;
use axum_helpers::{create_app, create_router, cors_layer_from_env, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_notifications::{
    ApiDoc, EmailProvider, NotificationService, SmtpProvider, handlers,
};
use eyre::WrapErr;
use tracing::{info, warn};

pub mod config;

use config::{Config, Environment};

/// Assemble the full application router around `service`.
pub fn build_router<P: EmailProvider + 'static>(
    service: NotificationService<P>,
    environment: &Environment,
) -> eyre::Result<Router> {
    let cors = cors_layer_from_env(environment).wrap_err("Invalid CORS configuration")?;

    Ok(create_router::<ApiDoc>(handlers::router(service), cors)
        .merge(health_router(core_config::app_info!())))
}

/// Load configuration, wire the SMTP transport and serve until shutdown.
pub async fn run() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        host = %config.smtp.host,
        port = config.smtp.port,
        tls = %config.smtp.tls,
        configured = config.smtp.is_configured(),
        "Mail transport settings loaded"
    );
    if !config.smtp.is_configured() {
        warn!("EMAIL_FROM is not set, notifications will be logged instead of sent");
    }

    let provider = SmtpProvider::new(config.smtp.clone()).wrap_err("Failed to create SMTP transport")?;
    let service = NotificationService::new(provider);

    if service.is_transport_configured() {
        let probe = service.clone();
        tokio::spawn(async move {
            match probe.provider().health_check().await {
                Ok(()) => info!("SMTP server reachable"),
                Err(e) => warn!(error = %e, "SMTP server not reachable at startup"),
            }
        });
    }

    let router = build_router(service, &config.environment)?;

    info!(
        name = config.app.name,
        version = config.app.version,
        "Starting notifications API"
    );
    create_app(router, &config.server).await?;

    info!("Notifications API shut down");
    Ok(())
}
