use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};
use axum_helpers::{AppError, ErrorResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::{OpenApi, ToSchema};

use crate::models::NotificationPayload;
use crate::providers::EmailProvider;
use crate::service::NotificationService;

pub const TAG: &str = "notifications";

/// Path of the notification endpoint inside the `/api` nest.
pub const NOTIFY_PATH: &str = "/v1/notify";

const SERVICE_NAME: &str = "order-notifications";

/// OpenAPI documentation for the Notifications API
#[derive(OpenApi)]
#[openapi(
    paths(send_notification, endpoint_health),
    components(schemas(NotificationPayload, NotifyResponse, NotifyEndpointHealth, ErrorResponse)),
    tags(
        (name = TAG, description = "Order event email notifications")
    )
)]
pub struct ApiDoc;

/// Body returned after a notification was accepted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotifyResponse {
    pub success: bool,
    /// Always "Notification sent successfully", also when `delivered` is false.
    pub message: String,
    #[schema(example = "order_created")]
    pub event: String,
    pub order_id: u64,
    /// False when the mail transport is unconfigured and the message was only logged.
    pub delivered: bool,
    pub message_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Status of the notification endpoint and its mail transport.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotifyEndpointHealth {
    pub status: String,
    pub service: String,
    pub version: String,
    pub transport: String,
    pub transport_configured: bool,
    pub endpoints: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Create the notifications router.
pub fn router<P: EmailProvider + 'static>(service: NotificationService<P>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(NOTIFY_PATH, get(endpoint_health).post(send_notification))
        .with_state(shared_service)
}

/// Send an order notification email
#[utoipa::path(
    post,
    path = "/api/v1/notify",
    tag = TAG,
    request_body = NotificationPayload,
    responses(
        (status = 200, description = "Notification accepted", body = NotifyResponse),
        (status = 400, description = "Malformed JSON or invalid fields", body = ErrorResponse),
        (status = 422, description = "Event has no message template", body = ErrorResponse),
        (status = 500, description = "Mail transport failed", body = ErrorResponse)
    )
)]
async fn send_notification<P: EmailProvider>(
    State(service): State<Arc<NotificationService<P>>>,
    payload: Result<Json<NotificationPayload>, JsonRejection>,
) -> Result<Json<NotifyResponse>, AppError> {
    let Json(payload) = payload?;
    debug!(event = ?payload.event, order_id = ?payload.order_id, "Notification request decoded");

    let receipt = service.notify(payload).await?;

    Ok(Json(NotifyResponse {
        success: true,
        message: "Notification sent successfully".to_string(),
        event: receipt.event.to_string(),
        order_id: receipt.order_id,
        delivered: receipt.outcome.is_delivered(),
        message_id: receipt.outcome.message_id().map(str::to_string),
        timestamp: Utc::now(),
    }))
}

/// Report endpoint and mail transport status
#[utoipa::path(
    get,
    path = "/api/v1/notify",
    tag = TAG,
    responses(
        (status = 200, description = "Endpoint status", body = NotifyEndpointHealth)
    )
)]
async fn endpoint_health<P: EmailProvider>(
    State(service): State<Arc<NotificationService<P>>>,
) -> Json<NotifyEndpointHealth> {
    let transport_configured = service.is_transport_configured();

    Json(NotifyEndpointHealth {
        status: if transport_configured { "healthy" } else { "degraded" }.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        transport: service.transport_name().to_string(),
        transport_configured,
        endpoints: vec![format!("POST /api{}", NOTIFY_PATH), format!("GET /api{}", NOTIFY_PATH)],
        timestamp: Utc::now(),
    })
}
