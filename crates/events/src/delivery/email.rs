//! SMTP delivery over STARTTLS.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("invalid email configuration: {0}")]
    Config(String),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Sender, e.g. `Unajmi <no-reply@unajmi.example>`.
    pub from_address: String,
}

impl EmailConfig {
    /// Reads SMTP settings from the environment. Returns `None` when
    /// `SMTP_HOST` is unset, which disables email delivery entirely.
    pub fn from_env() -> Result<Option<EmailConfig>, EmailError> {
        let Ok(smtp_host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };
        let smtp_port = match std::env::var("SMTP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| EmailError::Config(format!("SMTP_PORT is not a port: {raw}")))?,
            Err(_) => 587,
        };
        let smtp_username = std::env::var("SMTP_USERNAME")
            .map_err(|_| EmailError::Config("SMTP_USERNAME is required with SMTP_HOST".into()))?;
        let smtp_password = std::env::var("SMTP_PASSWORD")
            .map_err(|_| EmailError::Config("SMTP_PASSWORD is required with SMTP_HOST".into()))?;
        let from_address = std::env::var("SMTP_FROM")
            .map_err(|_| EmailError::Config("SMTP_FROM is required with SMTP_HOST".into()))?;

        Ok(Some(EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
        }))
    }
}

#[derive(Clone)]
pub struct EmailDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailDelivery {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|_| EmailError::Config(format!("bad SMTP_FROM: {}", config.from_address)))?;
        Ok(EmailDelivery { transport, from })
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}
