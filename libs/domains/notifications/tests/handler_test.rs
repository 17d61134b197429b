//! Handler tests for the notifications domain
//!
//! These exercise the notification router in isolation:
//! - JSON decoding and validation errors
//! - Status codes for unsupported events and transport failures
//! - Response bodies for delivered and simulated sends

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_notifications::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_notify(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/notify")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_notify_delivers_and_returns_200() {
    let provider = InMemoryEmailProvider::new();
    let app = handlers::router(NotificationService::new(provider.clone()));

    let response = app
        .oneshot(post_notify(json!({
            "event": "status_changed",
            "email": "customer@example.com",
            "order_id": 42,
            "extra_data": "SHIPPED"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: NotifyResponse = json_body(response.into_body()).await;
    assert!(body.success);
    assert!(body.delivered);
    assert_eq!(body.message, "Notification sent successfully");
    assert_eq!(body.event, "status_changed");
    assert_eq!(body.order_id, 42);
    assert_eq!(body.message_id.as_deref(), Some("memory-1"));

    let sent = provider.sent_emails().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Order Update #42");
    assert_eq!(sent[0].body, "Your order status is now: SHIPPED");
}

#[tokio::test]
async fn test_notify_without_transport_config_reports_not_delivered() {
    let provider = InMemoryEmailProvider::unconfigured();
    let app = handlers::router(NotificationService::new(provider.clone()));

    let response = app
        .oneshot(post_notify(json!({
            "event": "order_created",
            "email": "customer@example.com",
            "order_id": 1
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: NotifyResponse = json_body(response.into_body()).await;
    assert!(body.success);
    assert!(!body.delivered);
    assert_eq!(body.message, "Notification sent successfully");
    assert_eq!(body.message_id, None);
    assert_eq!(provider.send_attempts(), 0);
}

#[tokio::test]
async fn test_notify_validation_failure_returns_400_with_fields() {
    let provider = InMemoryEmailProvider::new();
    let app = handlers::router(NotificationService::new(provider.clone()));

    let response = app
        .oneshot(post_notify(json!({
            "event": "",
            "email": "not-an-email",
            "order_id": 0
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "VALIDATION_ERROR");
    let fields: Vec<String> = body
        .details
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["email", "event", "order_id"]);
    assert_eq!(provider.send_attempts(), 0);
}

#[tokio::test]
async fn test_notify_malformed_json_returns_400() {
    let app = handlers::router(NotificationService::new(InMemoryEmailProvider::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/notify")
        .header("content-type", "application/json")
        .body(Body::from("{\"event\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_notify_unknown_event_returns_422_without_sending() {
    let provider = InMemoryEmailProvider::new();
    let app = handlers::router(NotificationService::new(provider.clone()));

    let response = app
        .oneshot(post_notify(json!({
            "event": "foo",
            "email": "customer@example.com",
            "order_id": 5
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert!(body.message.contains("foo"));
    assert_eq!(provider.send_attempts(), 0);
}

#[tokio::test]
async fn test_notify_transport_failure_returns_500_without_details() {
    let provider = InMemoryEmailProvider::failing("535 5.7.8 authentication failed for shop@example.com");
    let app = handlers::router(NotificationService::new(provider.clone()));

    let response = app
        .oneshot(post_notify(json!({
            "event": "payment_confirmed",
            "email": "customer@example.com",
            "order_id": 9,
            "extra_data": "$20.00"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert!(!body.message.contains("535"));
    assert!(!body.message.contains("shop@example.com"));
    assert_eq!(provider.send_attempts(), 1);
}

#[tokio::test]
async fn test_endpoint_health_reports_transport() {
    let app = handlers::router(NotificationService::new(InMemoryEmailProvider::unconfigured()));

    let response = app
        .oneshot(Request::builder().uri("/v1/notify").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: NotifyEndpointHealth = json_body(response.into_body()).await;
    assert_eq!(body.transport, "memory");
    assert!(!body.transport_configured);
    assert_eq!(body.status, "degraded");
    assert!(body.endpoints.contains(&"POST /api/v1/notify".to_string()));
}

#[tokio::test]
async fn test_notify_undeliverable_address_is_a_client_error() {
    for provider in [InMemoryEmailProvider::new(), InMemoryEmailProvider::unconfigured()] {
        let app = handlers::router(NotificationService::new(provider.clone()));

        let response = app
            .oneshot(post_notify(json!({
                "event": "order_created",
                "email": "a..b@example.com",
                "order_id": 1
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = json_body(response.into_body()).await;
        assert_eq!(body.error, "VALIDATION_ERROR");
        assert_eq!(body.details.unwrap()[0]["field"], "email");
        assert_eq!(provider.send_attempts(), 0);
    }
}
