//! Email service for notifying responders of new reports

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MailConfig;
use crate::models::ReportDetails;

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
      .container { max-width: 600px; margin: 0 auto; padding: 20px; }
      .header { background-color: #dc2626; color: white; padding: 20px; margin-bottom: 20px; }
      .details { background-color: #f9fafb; padding: 20px; border-radius: 8px; }
      .footer { margin-top: 20px; padding-top: 20px; border-top: 1px solid #e5e7eb; font-size: 0.875rem; color: #6b7280; }
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header"><h1 style="margin: 0;">Emergency Report Alert</h1></div>
      <div class="details">
        <h2>Report Details:</h2>
        <p><strong>Type:</strong> {{ kind }}</p>
        <p><strong>Location:</strong> {{ location }}</p>
        <p><strong>Contact:</strong> {{ contact }}</p>
        <h2>Description:</h2>
        <p>{{ description }}</p>
      </div>
      <div class="footer">
        <p>This is an automated message from the Emergency Response System.</p>
        <p>Please respond to this emergency according to standard protocols.</p>
      </div>
    </div>
  </body>
</html>
"#;

/// A rendered email ready to hand to a [`Mailer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Outbound mail transport. Returns the id of the sent message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<String>;
}

/// SMTP mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let builder = if config.smtp_host == "localhost" {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        } else if config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
        };

        let mut builder = builder.port(config.smtp_port);
        if let Some(username) = &config.smtp_username {
            let password = config.smtp_password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        let mut builder = Message::builder()
            .from(email.from.parse().map_err(|e| anyhow!("Invalid from address: {}", e))?)
            .subject(email.subject)
            .message_id(Some(format!("<{}@emergency-hub>", id)))
            .header(ContentType::TEXT_HTML);
        for to in &email.to {
            builder = builder.to(to.parse().map_err(|e| anyhow!("Invalid to address '{}': {}", to, e))?);
        }
        let message = builder
            .body(email.html)
            .map_err(|e| anyhow!("Failed to build email: {}", e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;

        Ok(id)
    }
}

/// Render the HTML body of a report notification. Report fields are escaped.
pub fn render_report_email(report: &ReportDetails) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("kind", &report.kind);
    context.insert("location", &report.location);
    context.insert("contact", &report.contact);
    context.insert("description", &report.description);

    tera::Tera::one_off(REPORT_TEMPLATE, &context, true).context("Failed to render report email")
}

pub fn report_subject(report: &ReportDetails) -> String {
    format!("URGENT: New Emergency Report - {}", report.kind)
}

/// Sends report notifications to the configured responders
pub struct ReportMailer {
    mailer: Arc<dyn Mailer>,
    from: String,
    to: Vec<String>,
}

impl ReportMailer {
    pub fn new(mailer: Arc<dyn Mailer>, config: &MailConfig) -> Self {
        Self {
            mailer,
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }

    /// Notify responders of `report` and return the email id.
    pub async fn send_report(&self, report: &ReportDetails) -> Result<String> {
        if self.to.is_empty() {
            return Err(anyhow!("No report recipients configured"));
        }

        let email = OutgoingEmail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: report_subject(report),
            html: render_report_email(report)?,
        };

        tracing::info!("Sending '{}' report to {} recipient(s)", report.kind, email.to.len());
        let id = self.mailer.send(email).await?;
        tracing::info!("Report email sent: {}", id);
        Ok(id)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Mailer that records messages instead of sending them
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub fail_with: Option<String>,
    }

    impl RecordingMailer {
        pub fn failing(message: &str) -> Self {
            Self {
                sent: Mutex::default(),
                fail_with: Some(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<String> {
            if let Some(message) = &self.fail_with {
                return Err(anyhow!("{}", message));
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push(email);
            Ok(format!("email-{}", sent.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingMailer;
    use super::*;

    fn report() -> ReportDetails {
        ReportDetails {
            kind: "Flood".into(),
            description: "Water rising fast near the market".into(),
            location: "Oshodi".into(),
            contact: "Ada (08031234567)".into(),
        }
    }

    fn mail_config() -> MailConfig {
        MailConfig {
            to: vec!["responders@example.com".into()],
            ..MailConfig::default()
        }
    }

    #[test]
    fn test_render_report_email() {
        let html = render_report_email(&report()).unwrap();

        assert!(html.contains("<strong>Type:</strong> Flood"));
        assert!(html.contains("<strong>Location:</strong> Oshodi"));
        assert!(html.contains("Water rising fast near the market"));
    }

    #[test]
    fn test_render_escapes_report_fields() {
        let mut report = report();
        report.description = "<script>alert(1)</script>".into();

        let html = render_report_email(&report).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_send_report() {
        let mailer = Arc::new(RecordingMailer::default());
        let reports = ReportMailer::new(mailer.clone(), &mail_config());

        let id = reports.send_report(&report()).await.unwrap();

        assert_eq!(id, "email-1");
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "URGENT: New Emergency Report - Flood");
        assert_eq!(sent[0].to, vec!["responders@example.com".to_string()]);
        assert_eq!(sent[0].from, MailConfig::default().from);
    }

    #[tokio::test]
    async fn test_send_report_without_recipients_fails() {
        let mailer = Arc::new(RecordingMailer::default());
        let reports = ReportMailer::new(mailer.clone(), &MailConfig::default());

        let err = reports.send_report(&report()).await.unwrap_err();

        assert_eq!(err.to_string(), "No report recipients configured");
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_smtp_mailer_from_config() {
        assert!(SmtpMailer::from_config(&MailConfig::default()).is_ok());

        let config = MailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_username: Some("relay".into()),
            smtp_password: Some("secret".into()),
            ..MailConfig::default()
        };
        assert!(SmtpMailer::from_config(&config).is_ok());
    }
}
