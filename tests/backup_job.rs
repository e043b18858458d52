mod common;

use std::time::Duration;

use chrono::NaiveDate;

use punchclock::backup::{run_daily_backup, BackupRequest, BackupSummary};
use punchclock::email::Sender;

use common::RecordingMailer;

fn request(date: NaiveDate, dir: &std::path::Path) -> BackupRequest {
    BackupRequest {
        date,
        recipient: common::ADMIN_EMAIL.to_string(),
        sender: Sender {
            name: "Punchclock".to_string(),
            address: "noreply@example.com".to_string(),
        },
        output_dir: dir.to_path_buf(),
        send_timeout: Duration::from_secs(5),
    }
}

fn july_20() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 20).unwrap()
}

async fn insert_user(pool: &sqlx::SqlitePool, employee_id: &str, name: &str) -> i64 {
    common::insert_user(pool, employee_id, name, "employee", None)
        .await
        .id
}

async fn insert_log(
    pool: &sqlx::SqlitePool,
    user_id: i64,
    date: &str,
    time_in: Option<&str>,
    time_out: Option<&str>,
    hours: Option<f64>,
) {
    sqlx::query("INSERT INTO logs (user_id, date, time_in, time_out, hours) VALUES (?1, ?2, ?3, ?4, ?5)")
        .bind(user_id)
        .bind(date)
        .bind(time_in)
        .bind(time_out)
        .bind(hours)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn exports_only_the_requested_date() {
    let pool = common::memory_pool().await;
    let dir = common::scratch_dir();
    let mailer = RecordingMailer::default();

    let e1 = insert_user(&pool, "E1", "A").await;
    let e2 = insert_user(&pool, "E2", "B").await;
    insert_log(&pool, e1, "2025-07-20", Some("08:00"), Some("17:00"), Some(9.0)).await;
    insert_log(&pool, e2, "2025-07-20", Some("09:00"), None, None).await;
    insert_log(&pool, e1, "2025-07-19", Some("08:00"), Some("12:00"), Some(4.0)).await;

    let summary = run_daily_backup(&request(july_20(), &dir), &pool, &mailer)
        .await
        .unwrap();
    assert!(matches!(summary, BackupSummary::Delivered { rows: 2, .. }));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].attachments[0],
        "Employee ID,Name,Role,Date,Time In,Time Out,Hours\n\
         E1,A,employee,2025-07-20,08:00,17:00,9\n\
         E2,B,employee,2025-07-20,09:00,,\n"
    );
    assert!(!dir.join("backup_2025-07-20.csv").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn logs_of_missing_users_are_excluded() {
    let pool = common::memory_pool().await;
    let dir = common::scratch_dir();
    let mailer = RecordingMailer::default();

    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&pool)
        .await
        .unwrap();

    let e1 = insert_user(&pool, "E1", "A").await;
    insert_log(&pool, e1, "2025-07-20", Some("08:00"), None, None).await;
    insert_log(&pool, 4242, "2025-07-20", Some("08:00"), None, None).await;

    let summary = run_daily_backup(&request(july_20(), &dir), &pool, &mailer)
        .await
        .unwrap();
    assert!(matches!(summary, BackupSummary::Delivered { rows: 1, .. }));
    assert_eq!(mailer.sent()[0].attachments[0].lines().count(), 2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn empty_day_is_not_an_error() {
    let pool = common::memory_pool().await;
    let dir = common::scratch_dir();
    let mailer = RecordingMailer::default();

    let summary = run_daily_backup(&request(july_20(), &dir), &pool, &mailer)
        .await
        .unwrap();
    assert_eq!(summary, BackupSummary::NoLogs { date: july_20() });
    assert!(mailer.sent().is_empty());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn reruns_are_byte_identical() {
    let pool = common::memory_pool().await;
    let dir = common::scratch_dir();
    let mailer = RecordingMailer::default();

    let e1 = insert_user(&pool, "E1", "A").await;
    insert_log(&pool, e1, "2025-07-20", Some("08:00"), Some("16:30"), Some(8.5)).await;

    run_daily_backup(&request(july_20(), &dir), &pool, &mailer).await.unwrap();
    run_daily_backup(&request(july_20(), &dir), &pool, &mailer).await.unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].attachments[0], sent[1].attachments[0]);

    let _ = std::fs::remove_dir_all(&dir);
}
