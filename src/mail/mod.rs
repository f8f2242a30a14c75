use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(String),
    #[error("failed to build mail: {0}")]
    Build(String),
    #[error("failed to send mail: {0}")]
    Transport(String),
}

/// Outbound mail collaborator. The password-reset flow is the only caller.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Delivers over SMTP with the configured relay credentials.
pub struct SmtpMailer {
    cfg: MailConfig,
}

impl SmtpMailer {
    pub fn new(cfg: MailConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let from = self
            .cfg
            .from_address
            .parse()
            .map_err(|err| MailError::Address(format!("from: {err}")))?;
        let to = to
            .parse()
            .map_err(|err| MailError::Address(format!("to: {err}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())
            .map_err(|err| MailError::Build(err.to_string()))?;

        let credentials = Credentials::new(
            self.cfg.smtp_username.clone(),
            self.cfg.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.cfg.smtp_host)
            .map_err(|err| MailError::Transport(err.to_string()))?
            .port(self.cfg.smtp_port)
            .credentials(credentials)
            .build();

        transport
            .send(message)
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        Ok(())
    }
}

/// Used when no mail config is present: writes the mail to the log so reset
/// links remain reachable in development.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(%to, %subject, %body, "mail delivery skipped (no SMTP configured)");
        Ok(())
    }
}
