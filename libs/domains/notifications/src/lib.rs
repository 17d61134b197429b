//! Notifications Domain
//!
//! Turns order events into customer emails.
//!
//! # Flow
//!
//! ```text
//! ┌─────────────────┐
//! │   API Handler   │  ← Decodes JSON, maps errors to HTTP
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │    Validator    │  ← event / email / order_id constraints
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ NotificationSvc │  ← Routes by event, renders subject/body
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ Email Provider  │  ← SMTP, or in-memory for tests
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_config::FromEnv;
//! use domain_notifications::{NotificationService, SmtpConfig, SmtpProvider};
//!
//! let provider = SmtpProvider::new(SmtpConfig::from_env()?)?;
//! let service = NotificationService::new(provider);
//! let app = domain_notifications::handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod service;
pub mod templates;

// Re-export commonly used types
pub use error::{FieldViolation, NotificationError, NotificationResult, TransportError, ValidationError};
pub use handlers::{ApiDoc, NotifyEndpointHealth, NotifyResponse};
pub use models::{
    DispatchOutcome, NotificationEvent, NotificationPayload, NotificationReceipt,
    NotificationRequest, RenderedMessage, validate_request,
};
pub use providers::{
    EmailProvider, InMemoryEmailProvider, SentEmail, SentMessage, SmtpConfig, SmtpProvider, SmtpTls,
};
pub use service::NotificationService;
