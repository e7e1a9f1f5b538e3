// Email side-effect sender
//
// Renders the per-kind templates and hands them to a Mailer transport.
// `send` logs failures and returns them; callers in the pipeline decide
// whether to swallow them.

pub mod smtp;
pub mod templates;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use taskdeck_core::{Mailer, OutgoingEmail, Result};

use crate::config::SmtpConfig;
pub use smtp::{LogMailer, SmtpMailer};
use templates::RenderedEmail;

pub struct EmailService {
    mailer: Arc<dyn Mailer>,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// SMTP when credentials are configured, log-only otherwise
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let mailer: Arc<dyn Mailer> = if config.is_enabled() {
            tracing::info!(host = %config.host, port = config.port, "SMTP email delivery enabled");
            Arc::new(SmtpMailer::new(config)?)
        } else {
            tracing::info!("SMTP credentials not set, emails will be logged only");
            Arc::new(LogMailer)
        };
        Ok(Self::new(mailer))
    }

    pub fn mailer_name(&self) -> &'static str {
        self.mailer.name()
    }

    pub async fn send_task_assigned_email(
        &self,
        to: &str,
        task_title: &str,
        assigned_by: &str,
    ) -> Result<()> {
        self.send_rendered(to, templates::task_assigned(task_title, assigned_by))
            .await
    }

    pub async fn send_task_due_email(
        &self,
        to: &str,
        task_title: &str,
        due_date: DateTime<Utc>,
    ) -> Result<()> {
        self.send_rendered(to, templates::task_due(task_title, due_date))
            .await
    }

    pub async fn send_comment_notification_email(
        &self,
        to: &str,
        task_title: &str,
        comment_author: &str,
    ) -> Result<()> {
        self.send_rendered(to, templates::comment_added(task_title, comment_author))
            .await
    }

    pub async fn send_project_invite_email(
        &self,
        to: &str,
        project_name: &str,
        invited_by: &str,
    ) -> Result<()> {
        self.send_rendered(to, templates::project_invite(project_name, invited_by))
            .await
    }

    pub async fn send_task_completed_email(
        &self,
        to: &str,
        task_title: &str,
        completed_by: &str,
    ) -> Result<()> {
        self.send_rendered(to, templates::task_completed(task_title, completed_by))
            .await
    }

    /// Send one email; failures are logged with the recipient and returned
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let email = OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        };

        if let Err(e) = self.mailer.send(&email).await {
            tracing::error!(
                to = %to,
                mailer = self.mailer.name(),
                error = %e,
                "Failed to send email"
            );
            return Err(e);
        }
        Ok(())
    }

    async fn send_rendered(&self, to: &str, rendered: RenderedEmail) -> Result<()> {
        self.send(to, &rendered.subject, &rendered.html).await
    }
}
