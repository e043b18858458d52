//! Daily backup of attendance logs: query one date, write the CSV, mail it to
//! the administrator, then remove the local file.
//!
//! The CSV artifact is removed after every send attempt, whether delivery
//! succeeded or not, so no backup file outlives a run.

pub mod csv;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::config::MailConfig;
use crate::db;
use crate::email::{templates, EmailAttachment, Mailer, OutgoingEmail, Sender};
use crate::models::ExportRow;

/// Read access to the logs of one date, joined to their users.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn export_rows(&self, date: NaiveDate) -> Result<Vec<ExportRow>, sqlx::Error>;
}

#[async_trait]
impl LogSource for SqlitePool {
    async fn export_rows(&self, date: NaiveDate) -> Result<Vec<ExportRow>, sqlx::Error> {
        db::logs::export_rows_for_date(self, date).await
    }
}

#[derive(Debug, Clone)]
pub struct BackupRequest {
    pub date: NaiveDate,
    pub recipient: String,
    pub sender: Sender,
    pub output_dir: PathBuf,
    pub send_timeout: Duration,
}

impl BackupRequest {
    pub fn new(date: NaiveDate, mail: &MailConfig, output_dir: &Path) -> Self {
        Self {
            date,
            recipient: mail.admin_email.clone(),
            sender: mail.sender(),
            output_dir: output_dir.to_path_buf(),
            send_timeout: Duration::from_secs(mail.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupSummary {
    /// No logs matched the date; nothing was written or sent.
    NoLogs { date: NaiveDate },
    Delivered {
        date: NaiveDate,
        filename: String,
        rows: usize,
        recipient: String,
        response: String,
    },
}

impl BackupSummary {
    pub fn is_delivered(&self) -> bool {
        matches!(self, BackupSummary::Delivered { .. })
    }
}

impl std::fmt::Display for BackupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupSummary::NoLogs { date } => write!(f, "No logs for {date}."),
            BackupSummary::Delivered {
                filename,
                rows,
                recipient,
                response,
                ..
            } => write!(
                f,
                "Exported {rows} log(s) to {filename} and emailed {recipient} ({response})"
            ),
        }
    }
}

#[derive(Debug)]
pub enum BackupError {
    QueryFailed(String),
    WriteFailed(String),
    DeliveryFailed(String),
}

impl std::fmt::Display for BackupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupError::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            BackupError::WriteFailed(msg) => write!(f, "Write failed: {msg}"),
            BackupError::DeliveryFailed(msg) => write!(f, "Delivery failed: {msg}"),
        }
    }
}

impl std::error::Error for BackupError {}

pub fn backup_filename(date: NaiveDate) -> String {
    format!("backup_{}.csv", date.format("%Y-%m-%d"))
}

/// Runs one backup for `request.date`. Nothing is retried.
pub async fn run_daily_backup(
    request: &BackupRequest,
    source: &dyn LogSource,
    mailer: &dyn Mailer,
) -> Result<BackupSummary, BackupError> {
    let date = request.date.format("%Y-%m-%d").to_string();

    let rows = source.export_rows(request.date).await.map_err(|e| {
        tracing::error!("Backup query for {date} failed: {e}");
        BackupError::QueryFailed(e.to_string())
    })?;

    if rows.is_empty() {
        tracing::info!("No logs for {date}, nothing to back up");
        return Ok(BackupSummary::NoLogs { date: request.date });
    }

    let filename = backup_filename(request.date);
    let path = request.output_dir.join(&filename);

    if let Err(e) = tokio::fs::write(&path, csv::render(&rows)).await {
        tracing::error!("Failed to write {}: {e}", path.display());
        remove_artifact(&path).await;
        return Err(BackupError::WriteFailed(format!("{}: {e}", path.display())));
    }

    tracing::info!("Wrote {} log(s) for {date} to {}", rows.len(), path.display());

    let email = OutgoingEmail {
        from: request.sender.clone(),
        to: request.recipient.clone(),
        subject: templates::backup_subject(&date),
        text: templates::render_backup_body(&date, rows.len()),
        attachments: vec![EmailAttachment {
            filename: filename.clone(),
            path: path.clone(),
        }],
    };

    let sent = match tokio::time::timeout(request.send_timeout, mailer.send(email)).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => Err(BackupError::DeliveryFailed(e.message)),
        Err(_) => Err(BackupError::DeliveryFailed(format!(
            "mail transport timed out after {:?}",
            request.send_timeout
        ))),
    };

    remove_artifact(&path).await;

    let response = sent.inspect_err(|e| tracing::error!("Backup for {date} not delivered: {e}"))?;

    tracing::info!("Backup for {date} sent to {}", request.recipient);

    Ok(BackupSummary::Delivered {
        date: request.date,
        filename,
        rows: rows.len(),
        recipient: request.recipient.clone(),
        response,
    })
}

async fn remove_artifact(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove {}: {e}", path.display()),
    }
}
