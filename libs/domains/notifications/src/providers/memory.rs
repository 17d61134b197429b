//! In-memory email provider that records messages instead of sending them.

use super::{EmailProvider, SentEmail};
use crate::error::TransportError;
use crate::models::RenderedMessage;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A message captured by [`InMemoryEmailProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email provider that captures sent messages in memory.
#[derive(Clone)]
pub struct InMemoryEmailProvider {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    attempts: Arc<AtomicUsize>,
    configured: bool,
    failure_message: Option<String>,
}

impl InMemoryEmailProvider {
    /// Create a configured provider that accepts every message.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
            configured: true,
            failure_message: None,
        }
    }

    /// Create a provider with no sender identity.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Create a provider whose sends always fail with a session error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure_message: Some(message.into()),
            ..Self::new()
        }
    }

    /// Get all accepted messages.
    pub async fn sent_emails(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Number of times `send` was called, successful or not.
    pub fn send_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Check if a message was accepted for a specific address.
    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent.lock().await.iter().any(|m| m.to == email)
    }
}

impl Default for InMemoryEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for InMemoryEmailProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, to: &str, message: RenderedMessage) -> Result<SentEmail, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if !self.configured {
            return Err(TransportError::NotConfigured);
        }
        if let Some(reason) = &self.failure_message {
            return Err(TransportError::Session(reason.clone()));
        }

        let mut sent = self.sent.lock().await;
        sent.push(SentMessage {
            to: to.to_string(),
            subject: message.subject,
            body: message.body,
        });

        Ok(SentEmail {
            message_id: Some(format!("memory-{}", sent.len())),
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> RenderedMessage {
        RenderedMessage {
            subject: "Order Update #1".to_string(),
            body: "Your order status is now: PAID".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_sent_messages() {
        let provider = InMemoryEmailProvider::new();

        let sent = provider.send("a@example.com", message()).await.unwrap();

        assert_eq!(sent.message_id.as_deref(), Some("memory-1"));
        assert!(provider.was_sent_to("a@example.com").await);
        assert_eq!(provider.sent_emails().await[0].subject, "Order Update #1");
        assert_eq!(provider.send_attempts(), 1);
    }

    #[tokio::test]
    async fn test_failing_provider_counts_attempt_without_recording() {
        let provider = InMemoryEmailProvider::failing("connection refused");

        let err = provider.send("a@example.com", message()).await.unwrap_err();

        assert!(matches!(err, TransportError::Session(ref m) if m == "connection refused"));
        assert_eq!(provider.send_attempts(), 1);
        assert!(provider.sent_emails().await.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let provider = InMemoryEmailProvider::new();
        let clone = provider.clone();

        clone.send("b@example.com", message()).await.unwrap();

        assert!(provider.was_sent_to("b@example.com").await);
    }

    #[test]
    fn test_unconfigured() {
        assert!(!InMemoryEmailProvider::unconfigured().is_configured());
        assert!(InMemoryEmailProvider::new().is_configured());
    }
}
