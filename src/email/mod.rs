pub mod notify;
pub mod templates;

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;

/// The "From" identity of outgoing mail.
#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub name: String,
    pub address: String,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" <{}>", self.name, self.address)
    }
}

/// A file on local disk to attach, read when the message is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAttachment {
    pub filename: String,
    pub path: std::path::PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: Sender,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<EmailAttachment>,
}

#[derive(Debug)]
pub struct MailError {
    pub message: String,
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MailError {}

impl From<String> for MailError {
    fn from(s: String) -> Self {
        MailError { message: s }
    }
}

impl From<&str> for MailError {
    fn from(s: &str) -> Self {
        MailError {
            message: s.to_string(),
        }
    }
}

/// Outbound mail transport. Returns the transport's delivery confirmation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<String, MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP starttls error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String, MailError> {
        let message = build_message(email).await?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::from(format!("Failed to send email: {e}")))?;

        let text = response.message().collect::<Vec<_>>().join(" ");
        Ok(format!("{} {}", response.code(), text))
    }
}

async fn build_message(email: OutgoingEmail) -> Result<Message, MailError> {
    let from = Mailbox::new(
        Some(email.from.name.clone()),
        email
            .from
            .address
            .parse()
            .map_err(|e| MailError::from(format!("Invalid from address: {e}")))?,
    );

    let builder = Message::builder()
        .from(from)
        .to(email
            .to
            .parse()
            .map_err(|e| MailError::from(format!("Invalid to address: {e}")))?)
        .subject(email.subject);

    if email.attachments.is_empty() {
        return builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text)
            .map_err(|e| MailError::from(format!("Failed to build email: {e}")));
    }

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(email.text));
    for attachment in email.attachments {
        let body = tokio::fs::read(&attachment.path).await.map_err(|e| {
            MailError::from(format!(
                "Failed to read attachment {}: {e}",
                attachment.path.display()
            ))
        })?;
        let content_type = ContentType::parse(content_type_for(&attachment.filename))
            .map_err(|e| MailError::from(format!("Invalid attachment type: {e}")))?;
        multipart = multipart.singlepart(Attachment::new(attachment.filename).body(body, content_type));
    }

    builder
        .multipart(multipart)
        .map_err(|e| MailError::from(format!("Failed to build email: {e}")))
}

fn content_type_for(filename: &str) -> &'static str {
    if filename.ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    }
}
