//! Emails the CSV backup of one day's attendance logs to the administrator.
//!
//! Usage: `daily-backup [YYYY-MM-DD]` (defaults to today, host local time).
//! Meant to be run once a day by an external scheduler; a failed run exits
//! non-zero.

use std::process::ExitCode;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::EnvFilter;

use punchclock::backup::{self, BackupRequest};
use punchclock::clock;
use punchclock::config::BackupConfig;
use punchclock::email::SmtpMailer;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = match BackupConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    match run(config).await {
        Ok(summary) => {
            tracing::info!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Daily backup failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: BackupConfig) -> Result<backup::BackupSummary, Box<dyn std::error::Error>> {
    let date = match std::env::args().nth(1) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{raw}', expected YYYY-MM-DD: {e}"))?,
        None => clock::today(),
    };

    let options = config.database_url.parse::<SqliteConnectOptions>()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let mailer = SmtpMailer::new(&config.mail)?;
    let request = BackupRequest::new(date, &config.mail, &config.backup_dir);

    tracing::info!("Backing up logs for {date} to {}", request.recipient);

    let summary = backup::run_daily_backup(&request, &pool, &mailer).await;
    pool.close().await;

    Ok(summary?)
}
