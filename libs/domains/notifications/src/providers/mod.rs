//! Mail transport implementations.
//!
//! This module contains the `EmailProvider` trait, the SMTP transport used in
//! deployments and an in-memory transport for tests and local runs.

mod memory;
mod smtp;

pub use memory::{InMemoryEmailProvider, SentMessage};
pub use smtp::{SmtpConfig, SmtpProvider, SmtpTls};

use crate::error::TransportError;
use crate::models::RenderedMessage;
use async_trait::async_trait;

/// Result of a message accepted by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentEmail {
    /// Transport-specific identifier, when the server returned one.
    pub message_id: Option<String>,
}

/// Capability to deliver a rendered message to one recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Whether a sender identity is available.
    ///
    /// An unconfigured provider must not be asked to send.
    fn is_configured(&self) -> bool;

    /// Send `message` to `to`. Called at most once per request.
    async fn send(&self, to: &str, message: RenderedMessage) -> Result<SentEmail, TransportError>;

    /// Get the provider name for logging.
    fn name(&self) -> &'static str;

    /// Check that the transport can reach its server.
    async fn health_check(&self) -> Result<(), TransportError>;
}
