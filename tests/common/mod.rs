#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use punchclock::auth::jwt::Claims;
use punchclock::config::{Config, MailConfig};
use punchclock::email::{MailError, Mailer, OutgoingEmail};
use punchclock::models::User;

pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// An email captured by [`RecordingMailer`], with attachment contents read at
/// send time (the backup job deletes the file right after).
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub email: OutgoingEmail,
    pub attachments: Vec<String>,
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String, MailError> {
        let mut attachments = Vec::new();
        for attachment in &email.attachments {
            let body = tokio::fs::read_to_string(&attachment.path)
                .await
                .map_err(|e| MailError::from(e.to_string()))?;
            attachments.push(body);
        }
        self.sent.lock().unwrap().push(SentEmail { email, attachments });
        Ok("250 2.0.0 OK".to_string())
    }
}

/// A running test server over an in-memory database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    pub mailer: Arc<RecordingMailer>,
    pub backup_dir: PathBuf,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn create_user(&self, employee_id: &str, name: &str, role: &str) -> User {
        let email = format!("{employee_id}@example.com");
        insert_user(&self.pool, employee_id, name, role, Some(&email)).await
    }

    pub async fn insert_log(
        &self,
        user_id: i64,
        date: &str,
        time_in: Option<&str>,
        time_out: Option<&str>,
        hours: Option<f64>,
    ) {
        sqlx::query(
            "INSERT INTO logs (user_id, date, time_in, time_out, hours) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(user_id)
        .bind(date)
        .bind(time_in)
        .bind(time_out)
        .bind(hours)
        .execute(&self.pool)
        .await
        .expect("insert log failed");
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Users are provisioned outside this service; tests seed them directly.
pub async fn insert_user(
    pool: &SqlitePool,
    employee_id: &str,
    name: &str,
    role: &str,
    email: Option<&str>,
) -> User {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (employee_id, name, role, email) VALUES (?1, ?2, ?3, ?4) RETURNING *",
    )
    .bind(employee_id)
    .bind(name)
    .bind(role)
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("insert user failed")
}

/// Bearer token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    let claims = Claims {
        sub: user.id,
        role: user.role.clone(),
        exp: (Utc::now() + Duration::minutes(15)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encode failed")
}

/// A single-connection in-memory pool with migrations applied.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("punchclock_test_{}", Uuid::now_v7().simple()));
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

fn test_config(backup_dir: PathBuf, with_mail: bool) -> Config {
    let mail = with_mail.then(|| MailConfig {
        host: "smtp.example.com".to_string(),
        port: 587,
        user: "noreply@example.com".to_string(),
        pass: "secret".to_string(),
        from_name: "Punchclock".to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        timeout_secs: 5,
    });

    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        log_level: "warn".to_string(),
        backup_dir,
        mail,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn(true).await
}

pub async fn spawn_app_without_mail() -> TestApp {
    spawn(false).await
}

async fn spawn(with_mail: bool) -> TestApp {
    let pool = memory_pool().await;
    let backup_dir = scratch_dir();
    let mailer = Arc::new(RecordingMailer::default());

    let app_mailer: Option<Arc<dyn Mailer>> = if with_mail {
        Some(mailer.clone())
    } else {
        None
    };
    let app = punchclock::build_app(
        pool.clone(),
        test_config(backup_dir.clone(), with_mail),
        app_mailer,
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        mailer,
        backup_dir,
    }
}

pub async fn cleanup(app: TestApp) {
    app.pool.close().await;
    let _ = std::fs::remove_dir_all(&app.backup_dir);
}
