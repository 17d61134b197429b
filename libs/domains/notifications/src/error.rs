//! Error types for the notifications domain.

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors that can occur while validating or dispatching a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The request failed validation; the caller must fix its input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The event tag is well-formed but has no message template.
    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),

    /// The mail transport attempted a send and failed.
    #[error("Delivery failed: {0}")]
    DeliveryFailure(#[source] TransportError),
}

/// Errors reported by an [`EmailProvider`](crate::providers::EmailProvider).
#[derive(Debug, Error)]
pub enum TransportError {
    /// No sender identity is available; nothing was sent.
    #[error("Mail transport is not configured: sender address missing")]
    NotConfigured,

    #[error("Invalid {role} address '{address}': {details}")]
    InvalidAddress {
        role: &'static str,
        address: String,
        details: String,
    },

    #[error("Failed to build email message: {0}")]
    Message(String),

    #[error("Failed to set up mail transport: {0}")]
    Setup(String),

    /// Connection, authentication or protocol failure during the SMTP session.
    #[error("SMTP session failed: {0}")]
    Session(String),
}

/// A single violated constraint on an incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

/// Rejection produced by request validation.
///
/// Always holds at least one violation, ordered by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// A rejection for a single field.
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                reason: reason.into(),
            }],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether `field` is among the violated fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid notification request: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", violation.field, violation.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldViolation {
                    field: field.to_string(),
                    reason: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        // Two rules on one field can report the same reason.
        violations.dedup();

        Self { violations }
    }
}

/// Convert NotificationError to AppError for standardized error responses
impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Validation(e) => AppError::Validation {
                message: e.to_string(),
                details: serde_json::to_value(e.violations()).ok(),
            },
            NotificationError::UnsupportedEvent(event) => {
                AppError::UnprocessableEntity(format!("Unsupported event: {}", event))
            }
            NotificationError::DeliveryFailure(e) => {
                tracing::error!(error = %e, "Notification delivery failed");
                AppError::InternalServerError("Could not send the notification".to_string())
            }
        }
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_fields() {
        let err = ValidationError {
            violations: vec![
                FieldViolation {
                    field: "email".to_string(),
                    reason: "must be a valid email address".to_string(),
                },
                FieldViolation {
                    field: "order_id".to_string(),
                    reason: "must be greater than zero".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Invalid notification request: email must be a valid email address; order_id must be greater than zero"
        );
        assert!(err.has_field("order_id"));
        assert!(!err.has_field("event"));
    }

    #[test]
    fn test_delivery_failure_keeps_transport_source() {
        let err = NotificationError::DeliveryFailure(TransportError::Session(
            "535 authentication failed".to_string(),
        ));

        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("535 authentication failed"));
    }

    #[test]
    fn test_unsupported_event_message_names_event() {
        let err = NotificationError::UnsupportedEvent("order_shipped".to_string());
        assert_eq!(err.to_string(), "Unsupported event: order_shipped");
    }
}
