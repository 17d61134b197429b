//! Notification dispatch: route, render and deliver one request.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{NotificationError, NotificationResult, TransportError};
use crate::models::{DispatchOutcome, NotificationPayload, NotificationReceipt, NotificationRequest};
use crate::providers::EmailProvider;
use crate::templates;

/// Service layer for notification dispatch.
///
/// Holds no per-request state; clones share the same provider.
pub struct NotificationService<P: EmailProvider> {
    provider: Arc<P>,
}

impl<P: EmailProvider> Clone for NotificationService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: EmailProvider> NotificationService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Build a service around a provider the caller keeps a handle to.
    pub fn from_shared(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Compose the message for `request` and hand it to the mail transport.
    ///
    /// Sends at most once. An unconfigured transport yields
    /// [`DispatchOutcome::Simulated`] without calling `send`.
    #[instrument(skip(self, request), fields(order_id = request.order_id(), event = %request.event()))]
    pub async fn dispatch(&self, request: &NotificationRequest) -> NotificationResult<DispatchOutcome> {
        debug!("Notification received");

        let message = match templates::render(request) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "Notification rejected");
                return Err(err);
            }
        };
        debug!(subject = %message.subject, "Notification rendered");

        if !self.provider.is_configured() {
            warn!(
                provider = self.provider.name(),
                to = %request.email(),
                subject = %message.subject,
                "Mail transport not configured, notification logged instead of sent"
            );
            return Ok(DispatchOutcome::Simulated);
        }

        debug!(provider = self.provider.name(), "Attempting delivery");
        match self.provider.send(request.email(), message).await {
            Ok(sent) => {
                info!(message_id = ?sent.message_id, "Notification delivered");
                Ok(DispatchOutcome::Delivered {
                    message_id: sent.message_id,
                })
            }
            Err(TransportError::NotConfigured) => {
                warn!(
                    provider = self.provider.name(),
                    "Mail transport reported no sender identity, notification not sent"
                );
                Ok(DispatchOutcome::Simulated)
            }
            Err(err) => {
                error!(provider = self.provider.name(), error = %err, "Notification delivery failed");
                Err(NotificationError::DeliveryFailure(err))
            }
        }
    }

    /// Validate a decoded payload and dispatch it.
    pub async fn notify(&self, payload: NotificationPayload) -> NotificationResult<NotificationReceipt> {
        let request = payload.into_request()?;
        let outcome = self.dispatch(&request).await?;

        Ok(NotificationReceipt {
            event: request.event().clone(),
            order_id: request.order_id(),
            outcome,
        })
    }

    /// Whether the mail transport has a sender identity.
    pub fn is_transport_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Name of the mail transport, for health reporting.
    pub fn transport_name(&self) -> &'static str {
        self.provider.name()
    }
}
