//! Data models for the notifications domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ValidationError;

const REQUIRED: &str = "is required";
const INVALID_EMAIL: &str = "must be a valid email address";

/// Rejects addresses the mail transport cannot put in an envelope, such as
/// `a..b@example.com`, which the plain `email` rule lets through.
fn deliverable_address(email: &str) -> Result<(), validator::ValidationError> {
    email
        .parse::<lettre::Address>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("email").with_message(INVALID_EMAIL.into()))
}

// ============================================================================
// Events
// ============================================================================

/// Business event that triggered a notification.
///
/// Parsed from the wire tag by exact, case-sensitive match. Tags outside the
/// supported set are kept as [`NotificationEvent::Unrecognized`] so routing,
/// not validation, decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationEvent {
    /// `order_created`
    OrderCreated,
    /// `payment_confirmed`
    PaymentConfirmed,
    /// `status_changed`
    StatusChanged,
    /// Any other tag, kept verbatim for diagnostics.
    Unrecognized(String),
}

impl NotificationEvent {
    pub const ORDER_CREATED: &'static str = "order_created";
    pub const PAYMENT_CONFIRMED: &'static str = "payment_confirmed";
    pub const STATUS_CHANGED: &'static str = "status_changed";

    pub fn parse(tag: &str) -> Self {
        match tag {
            Self::ORDER_CREATED => Self::OrderCreated,
            Self::PAYMENT_CONFIRMED => Self::PaymentConfirmed,
            Self::STATUS_CHANGED => Self::StatusChanged,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// The wire tag for this event.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OrderCreated => Self::ORDER_CREATED,
            Self::PaymentConfirmed => Self::PAYMENT_CONFIRMED,
            Self::StatusChanged => Self::STATUS_CHANGED,
            Self::Unrecognized(tag) => tag,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NotificationEvent {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Notification request as decoded from the wire, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NotificationPayload {
    /// Event tag, e.g. `order_created`, `payment_confirmed`, `status_changed`.
    #[validate(
        required(message = "is required"),
        length(min = 1, message = "must not be empty")
    )]
    #[serde(default)]
    #[schema(example = "status_changed")]
    pub event: Option<String>,

    /// Recipient address.
    #[validate(
        required(message = "is required"),
        email(message = "must be a valid email address"),
        custom(function = "deliverable_address")
    )]
    #[serde(default)]
    #[schema(example = "customer@example.com")]
    pub email: Option<String>,

    /// Order the event refers to; must be greater than zero.
    #[validate(
        required(message = "is required"),
        range(min = 1, message = "must be greater than zero")
    )]
    #[serde(default)]
    #[schema(example = 42)]
    pub order_id: Option<u64>,

    /// Event-specific detail: payment amount or new status label.
    #[serde(default)]
    #[schema(example = "SHIPPED")]
    pub extra_data: Option<String>,
}

impl NotificationPayload {
    pub fn new(
        event: impl Into<String>,
        email: impl Into<String>,
        order_id: u64,
        extra_data: impl Into<String>,
    ) -> Self {
        Self {
            event: Some(event.into()),
            email: Some(email.into()),
            order_id: Some(order_id),
            extra_data: Some(extra_data.into()),
        }
    }

    /// Check every field constraint and produce an immutable request.
    ///
    /// Unknown event tags pass; only an empty or missing tag is rejected.
    pub fn into_request(self) -> Result<NotificationRequest, ValidationError> {
        self.validate()?;

        let event = self
            .event
            .ok_or_else(|| ValidationError::field("event", REQUIRED))?;
        let email = self
            .email
            .ok_or_else(|| ValidationError::field("email", REQUIRED))?;
        let order_id = self
            .order_id
            .ok_or_else(|| ValidationError::field("order_id", REQUIRED))?;

        Ok(NotificationRequest {
            event: NotificationEvent::parse(&event),
            email,
            order_id,
            extra_data: self.extra_data.unwrap_or_default(),
        })
    }
}

/// Validate a decoded payload. See [`NotificationPayload::into_request`].
pub fn validate_request(payload: NotificationPayload) -> Result<NotificationRequest, ValidationError> {
    payload.into_request()
}

/// A validated notification request.
///
/// Only obtainable through validation and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    event: NotificationEvent,
    email: String,
    order_id: u64,
    extra_data: String,
}

impl NotificationRequest {
    /// Build and validate a request in one step.
    pub fn new(
        event: impl Into<String>,
        email: impl Into<String>,
        order_id: u64,
        extra_data: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        NotificationPayload::new(event, email, order_id, extra_data).into_request()
    }

    pub fn event(&self) -> &NotificationEvent {
        &self.event
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    /// Event-specific detail; empty when the caller did not supply one.
    pub fn extra_data(&self) -> &str {
        &self.extra_data
    }
}

// ============================================================================
// Dispatch results
// ============================================================================

/// Subject and plain-text body composed for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// Successful dispatch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The mail transport accepted the message.
    Delivered { message_id: Option<String> },
    /// The transport has no sender identity; the message was only logged.
    Simulated,
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Delivered { message_id } => message_id.as_deref(),
            Self::Simulated => None,
        }
    }
}

/// What the service hands back to the HTTP layer after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReceipt {
    pub event: NotificationEvent,
    pub order_id: u64,
    pub outcome: DispatchOutcome,
}
