// Mail transports
// Decision: lettre async SMTP transport on the Tokio executor
// Decision: Without credentials, mail is logged instead of sent

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use taskdeck_core::{Error, Mailer, OutgoingEmail, Result};

use crate::config::SmtpConfig;

/// SMTP relay transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let (user, password) = config.credentials().ok_or_else(|| {
            Error::config("SMTP_USER and SMTP_PASS are required for SMTP delivery")
        })?;

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| Error::config(format!("Invalid SMTP host {}: {}", config.host, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| Error::config(format!("Invalid SMTP_FROM {}: {}", config.from, e)))?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| Error::email(format!("Invalid recipient {}: {}", email.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| Error::email(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let message = self.build_message(email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| Error::email(e.to_string()))?;

        tracing::info!(
            to = %email.to,
            code = %response.code(),
            "Email sent"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "SmtpMailer"
    }
}

/// Transport that only logs; used when SMTP is not configured
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "SMTP not configured, email not delivered"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogMailer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            user: Some("mailer".to_string()),
            password: Some("secret".to_string()),
            ..SmtpConfig::default()
        }
    }

    #[test]
    fn test_smtp_mailer_requires_credentials() {
        assert!(SmtpMailer::new(&SmtpConfig::default()).is_err());
    }

    #[test]
    fn test_invalid_from_address() {
        let config = SmtpConfig {
            from: "not an address".to_string(),
            ..smtp_config()
        };
        assert!(matches!(SmtpMailer::new(&config), Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn test_build_message_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(&smtp_config()).unwrap();
        let email = OutgoingEmail {
            to: "nobody".to_string(),
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        assert!(matches!(mailer.build_message(&email), Err(Error::Email(_))));

        let email = OutgoingEmail {
            to: "jo@example.com".to_string(),
            ..email
        };
        assert!(mailer.build_message(&email).is_ok());
    }

    #[tokio::test]
    async fn test_log_mailer_succeeds() {
        let email = OutgoingEmail {
            to: "jo@example.com".to_string(),
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        assert!(LogMailer.send(&email).await.is_ok());
    }
}
