use crate::error::{NotifyError, NotifyResult};
use async_trait::async_trait;
use mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Delivery seam used by the booking workflow.
///
/// Implementations attempt a single delivery and report the outcome;
/// whether to retry is the caller's decision.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a plain-text message. Returns a message id on success.
    async fn notify(&self, to: &str, subject: &str, body: &str) -> NotifyResult<String>;
}

/// Mail service configuration, loaded from the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
    pub from_email: String,
    pub from_name: String,
    pub enabled: bool,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            use_tls: std::env::var("SMTP_TLS_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            from_email: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@carelink.local".to_string()),
            from_name: std::env::var("EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "CareLink".to_string()),
            enabled: std::env::var("EMAIL_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// SMTP-backed notifier.
pub struct SmtpNotifier {
    config: EmailConfig,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Self {
        if !config.enabled {
            tracing::info!("email delivery disabled by configuration");
        }
        Self { config }
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, to: &str, subject: &str, body: &str) -> NotifyResult<String> {
        if !self.config.enabled {
            debug!(to, "email disabled, skipping send");
            return Ok(format!("disabled-{}", Uuid::new_v4()));
        }

        let message = MessageBuilder::new()
            .from((
                self.config.from_name.as_str(),
                self.config.from_email.as_str(),
            ))
            .to(to)
            .subject(subject)
            .text_body(body);

        let mut smtp_client = SmtpClientBuilder::new(self.config.host.as_str(), self.config.port)
            .implicit_tls(self.config.use_tls);
        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            smtp_client = smtp_client.credentials((user.as_str(), pass.as_str()));
        }

        let mut client = smtp_client
            .connect()
            .await
            .map_err(|e| NotifyError::SendFailed(format!("SMTP connection failed: {}", e)))?;

        let message_id = Uuid::new_v4().to_string();
        client
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(format!("failed to send email: {}", e)))?;

        debug!(message_id = %message_id, to, "email sent");
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_reads_smtp_settings_from_env() {
        std::env::set_var("SMTP_HOST", "mail.example.com");
        std::env::set_var("SMTP_PORT", "2525");
        std::env::set_var("EMAIL_ENABLED", "false");

        let config = EmailConfig::from_env();
        assert_eq!(config.host, "mail.example.com");
        assert_eq!(config.port, 2525);
        assert!(!config.enabled);

        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");
        std::env::remove_var("EMAIL_ENABLED");
    }

    #[tokio::test]
    async fn disabled_notifier_short_circuits() {
        let notifier = SmtpNotifier::new(EmailConfig {
            host: "localhost".to_string(),
            port: 587,
            username: None,
            password: None,
            use_tls: true,
            from_email: "noreply@carelink.local".to_string(),
            from_name: "CareLink".to_string(),
            enabled: false,
        });

        let message_id = notifier
            .notify("jane@x.com", "Appointment Confirmation", "Hello")
            .await
            .unwrap();
        assert!(message_id.starts_with("disabled-"));
    }
}
