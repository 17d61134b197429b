//! SMTP email provider implementation using lettre.

use super::{EmailProvider, SentEmail};
use crate::error::TransportError;
use crate::models::RenderedMessage;
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default};
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info};

/// Port used when `SMTP_PORT` is unset or not a valid port number.
pub const DEFAULT_SMTP_PORT: u16 = 587;

const IMPLICIT_TLS_PORT: u16 = 465;

/// How the connection to the SMTP server is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS (submission, port 587).
    StartTls,
    /// TLS from the first byte (SMTPS, port 465).
    Implicit,
    /// No encryption. Only for local capture servers such as Mailpit.
    Disabled,
}

impl SmtpTls {
    /// Default mode for a port: implicit TLS on 465, STARTTLS elsewhere.
    pub fn for_port(port: u16) -> Self {
        if port == IMPLICIT_TLS_PORT {
            Self::Implicit
        } else {
            Self::StartTls
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartTls => "starttls",
            Self::Implicit => "tls",
            Self::Disabled => "none",
        }
    }
}

impl fmt::Display for SmtpTls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmtpTls {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Implicit),
            "none" | "off" => Ok(Self::Disabled),
            other => Err(ConfigError::InvalidValue {
                key: "SMTP_TLS".to_string(),
                details: format!("expected starttls, tls or none, got '{}'", other),
            }),
        }
    }
}

/// SMTP configuration.
///
/// A missing sender address leaves the provider unconfigured: it reports
/// `is_configured() == false` and refuses to send.
#[derive(Clone)]
pub struct SmtpConfig {
    /// SMTP server host.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    pub tls: SmtpTls,
    /// Sender email address.
    pub from_email: Option<String>,
    /// Sender display name.
    pub from_name: Option<String>,
    /// SMTP login. Falls back to the sender address when unset.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Create an unconfigured SMTP configuration for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: SmtpTls::for_port(port),
            from_email: None,
            from_name: None,
            username: None,
            password: None,
        }
    }

    /// Builder method to set the sender identity.
    pub fn with_sender(mut self, from_email: impl Into<String>, from_name: Option<String>) -> Self {
        self.from_email = Some(from_email.into());
        self.from_name = from_name;
        self
    }

    /// Builder method to set credentials.
    pub fn with_credentials(mut self, username: Option<String>, password: impl Into<String>) -> Self {
        self.username = username;
        self.password = Some(password.into());
        self
    }

    /// Builder method to set TLS mode.
    pub fn with_tls(mut self, tls: SmtpTls) -> Self {
        self.tls = tls;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.from_email.is_some()
    }

    /// Login credentials, present only when a password is configured.
    fn credentials(&self) -> Option<Credentials> {
        let password = self.password.as_ref()?;
        let username = self.username.as_ref().or(self.from_email.as_ref())?;
        Some(Credentials::new(username.clone(), password.clone()))
    }
}

impl FromEnv for SmtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("SMTP_HOST", "localhost");
        let port = env_optional("SMTP_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);
        let tls = match env_optional("SMTP_TLS") {
            Some(value) => value.parse()?,
            None => SmtpTls::for_port(port),
        };

        Ok(Self {
            host,
            port,
            tls,
            from_email: env_optional("EMAIL_FROM"),
            from_name: env_optional("EMAIL_FROM_NAME"),
            username: env_optional("SMTP_USERNAME"),
            password: env_optional("EMAIL_PASSWORD"),
        })
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// SMTP email provider.
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

impl SmtpProvider {
    /// Create a new SMTP provider. No connection is opened until the first send.
    pub fn new(config: SmtpConfig) -> Result<Self, TransportError> {
        let transport = Self::build_transport(&config)?;
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    /// Build the SMTP transport based on configuration.
    fn build_transport(
        config: &SmtpConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let builder = match config.tls {
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| TransportError::Setup(format!("STARTTLS relay: {}", e)))?,
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| TransportError::Setup(format!("TLS relay: {}", e)))?,
            SmtpTls::Disabled => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let mut builder = builder.port(config.port);
        if let Some(credentials) = config.credentials() {
            builder = builder.credentials(credentials);
        }

        Ok(builder.build())
    }

    /// Build a plain-text lettre Message for one recipient.
    fn build_message(&self, to: &str, message: RenderedMessage) -> Result<Message, TransportError> {
        let from_email = self
            .config
            .from_email
            .as_deref()
            .ok_or(TransportError::NotConfigured)?;

        let from = Mailbox::new(self.config.from_name.clone(), parse_address("sender", from_email)?);
        let to = Mailbox::new(None, parse_address("recipient", to)?);

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)
            .map_err(|e| TransportError::Message(e.to_string()))
    }
}

fn parse_address(role: &'static str, address: &str) -> Result<Address, TransportError> {
    address.parse().map_err(|e: lettre::address::AddressError| TransportError::InvalidAddress {
        role,
        address: address.to_string(),
        details: e.to_string(),
    })
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn send(&self, to: &str, message: RenderedMessage) -> Result<SentEmail, TransportError> {
        debug!(
            to = %to,
            subject = %message.subject,
            host = %self.config.host,
            port = %self.config.port,
            tls = %self.config.tls,
            "Sending email via SMTP"
        );

        let email = self.build_message(to, message)?;

        let response = self.transport.send(email).await.map_err(|e| {
            error!(to = %to, error = %e, "Failed to send email via SMTP");
            TransportError::Session(e.to_string())
        })?;

        let message_id = response.message().next().map(|s| s.to_string());

        info!(to = %to, message_id = ?message_id, "Email sent successfully via SMTP");

        Ok(SentEmail { message_id })
    }

    fn name(&self) -> &'static str {
        "SMTP"
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        let connected = self
            .transport
            .test_connection()
            .await
            .map_err(|e| TransportError::Session(format!("SMTP health check failed: {}", e)))?;

        if connected {
            Ok(())
        } else {
            Err(TransportError::Session(
                "SMTP server did not answer the connection test".to_string(),
            ))
        }
    }
}
