use std::net::IpAddr;
use std::path::PathBuf;

use crate::email::Sender;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub backup_dir: PathBuf,
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from_name: String,
    pub admin_email: String,
    pub timeout_secs: u64,
}

impl MailConfig {
    pub fn sender(&self) -> Sender {
        Sender {
            name: self.from_name.clone(),
            address: self.user.clone(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("PUNCHCLOCK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PUNCHCLOCK_HOST: {e}"))?;

        let port: u16 = env_or("PUNCHCLOCK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PUNCHCLOCK_PORT: {e}"))?;

        let log_level = env_or("PUNCHCLOCK_LOG_LEVEL", "info");
        let backup_dir = PathBuf::from(env_or("PUNCHCLOCK_BACKUP_DIR", "."));
        let mail = mail_from_env()?;

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            log_level,
            backup_dir,
            mail,
        })
    }
}

/// Settings for the scheduled `daily-backup` run. Unlike [`Config`] it needs
/// no JWT secret, and mail is mandatory.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub database_url: String,
    pub log_level: String,
    pub backup_dir: PathBuf,
    pub mail: MailConfig,
}

impl BackupConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let log_level = env_or("PUNCHCLOCK_LOG_LEVEL", "info");
        let backup_dir = PathBuf::from(env_or("PUNCHCLOCK_BACKUP_DIR", "."));

        let mail = mail_from_env()?.ok_or(
            "Mail is not configured: set EMAIL_SERVICE, EMAIL_USER, EMAIL_PASS and ADMIN_EMAIL",
        )?;

        Ok(BackupConfig {
            database_url,
            log_level,
            backup_dir,
            mail,
        })
    }
}

/// Mail settings are all-or-nothing: `None` unless service, account and
/// admin address are all set.
fn mail_from_env() -> Result<Option<MailConfig>, String> {
    let timeout_secs: u64 = env_or("PUNCHCLOCK_MAIL_TIMEOUT_SECS", "30")
        .parse()
        .map_err(|e| format!("Invalid PUNCHCLOCK_MAIL_TIMEOUT_SECS: {e}"))?;

    let mail = match (
        std::env::var("EMAIL_SERVICE").ok(),
        std::env::var("EMAIL_USER").ok(),
        std::env::var("EMAIL_PASS").ok(),
        std::env::var("ADMIN_EMAIL").ok(),
    ) {
        (Some(service), Some(user), Some(pass), Some(admin_email)) => Some(MailConfig {
            host: resolve_service_host(&service),
            port: env_or("EMAIL_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid EMAIL_PORT: {e}"))?,
            user,
            pass,
            from_name: env_or("EMAIL_FROM_NAME", "Punchclock"),
            admin_email,
            timeout_secs,
        }),
        _ => None,
    };

    Ok(mail)
}

/// Maps a well-known mail service name to its SMTP submission host. Anything
/// else is taken to be a host name already.
pub fn resolve_service_host(service: &str) -> String {
    match service.trim().to_ascii_lowercase().as_str() {
        "gmail" => "smtp.gmail.com".to_string(),
        "outlook" | "hotmail" | "outlook365" => "smtp-mail.outlook.com".to_string(),
        "yahoo" => "smtp.mail.yahoo.com".to_string(),
        "zoho" => "smtp.zoho.com".to_string(),
        _ => service.trim().to_string(),
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
