//! Message composition for order events.
//!
//! Each supported event maps to a fixed subject and plain-text body. Rendering
//! is plain string substitution; nothing is escaped.

use crate::error::{NotificationError, NotificationResult};
use crate::models::{NotificationEvent, NotificationRequest, RenderedMessage};

/// Placeholder used when a payment confirmation carries no amount.
pub const AMOUNT_NOT_SPECIFIED: &str = "Amount not specified";

/// Compose the subject and body for a validated request.
///
/// Fails with [`NotificationError::UnsupportedEvent`] for tags outside the
/// routing table.
pub fn render(request: &NotificationRequest) -> NotificationResult<RenderedMessage> {
    let order_id = request.order_id();

    let message = match request.event() {
        NotificationEvent::OrderCreated => RenderedMessage {
            subject: format!("We received your order #{}!", order_id),
            body: "Hello.\n\
                   We have received your order request.\n\
                   We are waiting for payment confirmation to process it."
                .to_string(),
        },
        NotificationEvent::PaymentConfirmed => {
            let amount = match request.extra_data() {
                "" => AMOUNT_NOT_SPECIFIED,
                amount => amount,
            };
            RenderedMessage {
                subject: format!("Payment Approved - Order #{}", order_id),
                body: format!(
                    "Good news! Your payment of {} was successful.\n\
                     We will prepare your package immediately.",
                    amount
                ),
            }
        }
        NotificationEvent::StatusChanged => RenderedMessage {
            subject: format!("Order Update #{}", order_id),
            body: format!("Your order status is now: {}", request.extra_data()),
        },
        NotificationEvent::Unrecognized(tag) => {
            return Err(NotificationError::UnsupportedEvent(tag.clone()));
        }
    };

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(event: &str, order_id: u64, extra_data: &str) -> NotificationRequest {
        NotificationRequest::new(event, "customer@example.com", order_id, extra_data).unwrap()
    }

    #[test]
    fn test_order_created() {
        let message = render(&request("order_created", 101, "ignored")).unwrap();

        assert_eq!(message.subject, "We received your order #101!");
        assert_eq!(
            message.body,
            "Hello.\nWe have received your order request.\nWe are waiting for payment confirmation to process it."
        );
    }

    #[test]
    fn test_payment_confirmed_with_amount() {
        let message = render(&request("payment_confirmed", 7, "$49.90")).unwrap();

        assert_eq!(message.subject, "Payment Approved - Order #7");
        assert_eq!(
            message.body,
            "Good news! Your payment of $49.90 was successful.\nWe will prepare your package immediately."
        );
    }

    #[test]
    fn test_payment_confirmed_without_amount() {
        let message = render(&request("payment_confirmed", 7, "")).unwrap();

        assert!(message.body.contains(AMOUNT_NOT_SPECIFIED));
    }

    #[test]
    fn test_status_changed_inserts_extra_data_verbatim() {
        let message = render(&request("status_changed", 42, "SHIPPED")).unwrap();
        assert_eq!(message.subject, "Order Update #42");
        assert_eq!(message.body, "Your order status is now: SHIPPED");

        let message = render(&request("status_changed", 42, "")).unwrap();
        assert_eq!(message.body, "Your order status is now: ");
    }

    #[test]
    fn test_subject_contains_order_id_for_every_supported_event() {
        for event in ["order_created", "payment_confirmed", "status_changed"] {
            let message = render(&request(event, 98765, "x")).unwrap();
            assert!(message.subject.contains("98765"), "{event}: {}", message.subject);
        }
    }

    #[test]
    fn test_unknown_event_is_unsupported() {
        let err = render(&request("order_shipped", 1, "")).unwrap_err();
        assert!(matches!(err, NotificationError::UnsupportedEvent(ref tag) if tag == "order_shipped"));
    }
}
