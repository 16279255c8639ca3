use crate::error::DeliveryError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;
use std::path::{Path, PathBuf};
pub mod error;

const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl SmtpSettings {
    /// Reads `SMTP_SERVER`, `SMTP_PORT` (default 587), `SMTP_USER` and
    /// `SMTP_PASSWORD`.
    pub fn from_env() -> Result<Self, DeliveryError> {
        dotenvy::dotenv().ok();

        let required = |name: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DeliveryError::NotConfigured(format!("{name} is not set")))
        };

        let port = match env::var("SMTP_PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
                DeliveryError::NotConfigured(format!("SMTP_PORT '{raw}' is not a port number"))
            })?,
            Err(_) => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            server: required("SMTP_SERVER")?,
            port,
            user: required("SMTP_USER")?,
            password: required("SMTP_PASSWORD")?,
        })
    }
}

/// The content of one report mail.
#[derive(Debug, Clone)]
pub struct ReportMail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

impl ReportMail {
    /// The standard report mail: subject `"<report name> - <period>"`.
    pub fn for_report(
        report_name: &str,
        period_label: &str,
        recipients: &[String],
        attachments: Vec<PathBuf>,
    ) -> Self {
        Self {
            recipients: recipients.to_vec(),
            subject: format!("{report_name} - {period_label}"),
            body: format!("Attached is the {report_name} for {period_label}."),
            attachments,
        }
    }
}

/// Sends report mails through an authenticated SMTP relay (STARTTLS).
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, DeliveryError> {
        let from = parse_mailbox(&settings.user)?;
        let credentials = Credentials::new(settings.user.clone(), settings.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)?
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, from })
    }

    /// Sends `mail`. A mail without recipients is skipped, not an error.
    pub async fn send(&self, mail: &ReportMail) -> Result<(), DeliveryError> {
        if mail.recipients.is_empty() {
            tracing::info!("No recipients configured; skipping delivery.");
            return Ok(());
        }

        let message = build_message(&self.from, mail)?;
        self.transport.send(message).await?;

        tracing::info!(recipients = ?mail.recipients, "Report mail sent.");
        Ok(())
    }
}

/// Builds the multipart message: a plain-text body and one attachment per file.
pub fn build_message(from: &Mailbox, mail: &ReportMail) -> Result<Message, DeliveryError> {
    let mut builder = Message::builder().from(from.clone()).subject(&mail.subject);
    for recipient in &mail.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
    for path in &mail.attachments {
        parts = parts.singlepart(attachment(path)?);
    }

    Ok(builder.multipart(parts)?)
}

fn attachment(path: &Path) -> Result<SinglePart, DeliveryError> {
    let body = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "attachment".to_string());
    let content_type = ContentType::parse("application/octet-stream")
        .map_err(|e| DeliveryError::NotConfigured(e.to_string()))?;
    Ok(Attachment::new(file_name).body(body, content_type))
}

pub fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| DeliveryError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}
