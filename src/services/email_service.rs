use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use validator::ValidateEmail;

use crate::config::{Config, SmtpConfig};
use crate::dto::email_dto::{text, SendEmailRequest};
use crate::error::{Error, Result};
use crate::models::email::{CandidateStatus, OutgoingEmail};

const SELECTED_TEMPLATE: &str = "Dear [Candidate Name],

We are pleased to inform you that you have been selected for the position of [Position].
Please reply to this email to confirm your acceptance.

Best regards,
HR Team";

const REJECTED_TEMPLATE: &str = "Dear [Candidate Name],

Thank you for applying for the position of [Position].
We regret to inform you that we have decided to move forward with other candidates.

Best regards,
HR Team";

const SEND_FAILED: &str = "Failed to send email. Check server logs and SMTP settings.";

/// Delivers a rendered message and returns its message id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<String>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpConfig, from: &str) -> anyhow::Result<Self> {
        let credentials = Credentials::new(smtp.user.clone(), smtp.pass.clone());
        let builder = if smtp.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
        };
        let transport = builder.port(smtp.port).credentials(credentials).build();
        Ok(Self {
            transport,
            from: from.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<String> {
        if !self.transport.test_connection().await? {
            anyhow::bail!("SMTP relay rejected the connection check");
        }
        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4(), self.from.email.domain());
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)?;
        self.transport.send(message).await?;
        Ok(message_id)
    }
}

#[derive(Clone)]
pub struct EmailService {
    mailer: Option<Arc<dyn Mailer>>,
}

impl EmailService {
    pub fn new(mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { mailer }
    }

    pub fn from_config(config: &Config) -> Self {
        let mailer = config.smtp.as_ref().and_then(|smtp| {
            match SmtpMailer::new(smtp, &config.mail_from) {
                Ok(m) => Some(Arc::new(m) as Arc<dyn Mailer>),
                Err(e) => {
                    tracing::error!(error = %e, host = %smtp.host, "Invalid SMTP configuration");
                    None
                }
            }
        });
        if mailer.is_none() {
            tracing::warn!("SMTP is not configured; sending email will fail");
        }
        Self::new(mailer)
    }

    pub fn render(status: CandidateStatus, name: &str, position: &str) -> (String, String) {
        let (template, subject) = match status {
            CandidateStatus::Selected => (
                SELECTED_TEMPLATE,
                format!("Application Status: Selected - {}", position),
            ),
            CandidateStatus::Rejected => (
                REJECTED_TEMPLATE,
                format!("Application Status: Update - {}", position),
            ),
        };
        let body = template
            .replace("[Candidate Name]", name)
            .replace("[Position]", position);
        (subject, body)
    }

    /// Checks the request field by field and renders the message.
    pub fn prepare(req: &SendEmailRequest) -> Result<OutgoingEmail> {
        let status = text(&req.status)
            .and_then(CandidateStatus::parse)
            .ok_or_else(|| {
                Error::BadRequest(
                    "Invalid status. Must be \"selected\" or \"rejected\".".to_string(),
                )
            })?;
        let name = non_blank(text(&req.name))
            .ok_or_else(|| Error::BadRequest("Candidate name is required.".to_string()))?;
        let email = text(&req.email)
            .map(str::trim)
            .filter(|e| !e.is_empty() && !e.contains(char::is_whitespace) && e.validate_email())
            .ok_or_else(|| {
                Error::BadRequest("A valid candidate email is required.".to_string())
            })?;
        let position = non_blank(text(&req.position))
            .ok_or_else(|| Error::BadRequest("Position is required.".to_string()))?;

        let (subject, body) = Self::render(status, name, position);
        Ok(OutgoingEmail {
            to: email.to_string(),
            subject,
            body,
        })
    }

    pub async fn send(&self, email: OutgoingEmail) -> Result<String> {
        let Some(mailer) = &self.mailer else {
            tracing::error!("Email send failed: missing SMTP config");
            return Err(Error::ExternalService(SEND_FAILED.to_string()));
        };
        let to = email.to.clone();
        match mailer.send(email).await {
            Ok(message_id) => {
                tracing::info!(to = %to, message_id = %message_id, "Candidate email sent");
                Ok(message_id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Email send failed");
                Err(Error::ExternalService(SEND_FAILED.to_string()))
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
