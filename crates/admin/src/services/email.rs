//! Email service for sending invite, reset, and verification links.
//!
//! Uses SMTP via lettre for delivery. Messages are plain text; the admin
//! API has no HTML surface.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a team invite with its acceptance link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send.
    pub async fn send_invite(
        &self,
        to: &str,
        name: &str,
        accept_url: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Hi {name},\n\n\
             You have been invited to join the Inkpress team.\n\n\
             Accept your invite within 7 days:\n{accept_url}\n"
        );
        self.send_text_email(to, "You're invited to Inkpress", &body)
            .await
    }

    /// Send a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send.
    pub async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), EmailError> {
        let body = format!(
            "A password reset was requested for your Inkpress account.\n\n\
             The link below is valid for one hour:\n{reset_url}\n\n\
             If you did not request this, you can ignore this message.\n"
        );
        self.send_text_email(to, "Reset your Inkpress password", &body)
            .await
    }

    /// Send an email-verification link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send.
    pub async fn send_email_verification(
        &self,
        to: &str,
        verify_url: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Confirm your email address for Inkpress:\n{verify_url}\n\n\
             The link is valid for 24 hours.\n"
        );
        self.send_text_email(to, "Verify your Inkpress email", &body)
            .await
    }

    /// Send a plain text email.
    async fn send_text_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .body(body.to_string())?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
