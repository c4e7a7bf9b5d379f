// src/services/mailer.rs

//! Notification delivery.
//!
//! [`Notifier`] is the narrow seam to the mail transport; [`SmtpNotifier`]
//! implements it over authenticated SMTP with STARTTLS.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::Result;
use crate::models::MailConfig;

/// Delivers one composed notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the message to the configured recipient. An `Err` means the
    /// transport did not confirm delivery.
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}

/// SMTP implementation of [`Notifier`].
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpNotifier {
    /// Build the transport from config; the password comes from the caller,
    /// resolved out of the environment, never out of the config file.
    pub fn new(mail: &MailConfig, password: String) -> Result<Self> {
        let credentials = Credentials::new(mail.sender().to_string(), password);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.smtp_host)?
            .port(mail.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            sender: mail.sender().parse()?,
            recipient: mail.recipient.parse()?,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .body(body.to_string())?;

        self.transport.send(message).await?;
        Ok(())
    }
}
