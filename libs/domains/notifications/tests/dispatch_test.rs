//! Dispatch tests against the in-memory provider.

use domain_notifications::templates::AMOUNT_NOT_SPECIFIED;
use domain_notifications::*;
use std::sync::Arc;

fn request(event: &str, order_id: u64, extra_data: &str) -> NotificationRequest {
    NotificationRequest::new(event, "customer@example.com", order_id, extra_data).unwrap()
}

#[tokio::test]
async fn test_each_supported_event_sends_one_message() {
    let provider = Arc::new(InMemoryEmailProvider::new());
    let service = NotificationService::from_shared(Arc::clone(&provider));

    service.dispatch(&request("order_created", 10, "")).await.unwrap();
    service.dispatch(&request("payment_confirmed", 11, "")).await.unwrap();
    service.dispatch(&request("status_changed", 12, "DELIVERED")).await.unwrap();

    let sent = provider.sent_emails().await;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].subject, "We received your order #10!");
    assert_eq!(sent[1].subject, "Payment Approved - Order #11");
    assert!(sent[1].body.contains(AMOUNT_NOT_SPECIFIED));
    assert_eq!(sent[2].body, "Your order status is now: DELIVERED");
    assert!(sent.iter().all(|m| m.to == "customer@example.com"));
}

#[tokio::test]
async fn test_duplicate_requests_are_not_deduplicated() {
    let provider = Arc::new(InMemoryEmailProvider::new());
    let service = NotificationService::from_shared(Arc::clone(&provider));
    let request = request("order_created", 3, "");

    let first = service.dispatch(&request).await.unwrap();
    let second = service.dispatch(&request).await.unwrap();

    assert_eq!(provider.send_attempts(), 2);
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_failure_is_reported_for_every_event() {
    for event in ["order_created", "payment_confirmed", "status_changed"] {
        let service = NotificationService::new(InMemoryEmailProvider::failing("connection reset"));

        let err = service.dispatch(&request(event, 1, "")).await.unwrap_err();

        assert!(matches!(err, NotificationError::DeliveryFailure(_)), "{event}");
        assert!(std::error::Error::source(&err).is_some());
    }
}

#[tokio::test]
async fn test_concurrent_dispatches_share_service() {
    let provider = Arc::new(InMemoryEmailProvider::new());
    let service = NotificationService::from_shared(Arc::clone(&provider));

    let handles: Vec<_> = (1..=8)
        .map(|order_id| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .dispatch(&request("order_created", order_id, ""))
                    .await
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_delivered());
    }
    assert_eq!(provider.sent_emails().await.len(), 8);
}
