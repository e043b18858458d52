use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::SqlitePool;

use crate::models::{ExportRow, LogRecord};

const EXPORT_COLUMNS: &str = "users.employee_id, users.name, users.role, logs.date,
     logs.time_in, logs.time_out, logs.hours";

pub async fn record_time_in(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<LogRecord, sqlx::Error> {
    sqlx::query_as::<_, LogRecord>(
        "INSERT INTO logs (user_id, date, time_in) VALUES (?1, ?2, ?3) RETURNING *",
    )
    .bind(user_id)
    .bind(date.format("%Y-%m-%d").to_string())
    .bind(time.format("%H:%M:%S").to_string())
    .fetch_one(pool)
    .await
}

pub async fn find_by_user_and_date(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Option<LogRecord>, sqlx::Error> {
    sqlx::query_as::<_, LogRecord>("SELECT * FROM logs WHERE user_id = ?1 AND date = ?2")
        .bind(user_id)
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_optional(pool)
        .await
}

/// The user's latest log still missing a time-out, dated no earlier than
/// `since`.
pub async fn find_open_since(
    pool: &SqlitePool,
    user_id: i64,
    since: NaiveDate,
) -> Result<Option<LogRecord>, sqlx::Error> {
    sqlx::query_as::<_, LogRecord>(
        "SELECT * FROM logs
         WHERE user_id = ?1 AND time_out IS NULL AND date >= ?2
         ORDER BY date DESC, id DESC LIMIT 1",
    )
    .bind(user_id)
    .bind(since.format("%Y-%m-%d").to_string())
    .fetch_optional(pool)
    .await
}

pub async fn record_time_out(
    pool: &SqlitePool,
    id: i64,
    time: NaiveTime,
    hours: f64,
) -> Result<LogRecord, sqlx::Error> {
    sqlx::query_as::<_, LogRecord>(
        "UPDATE logs SET time_out = ?2, hours = ?3 WHERE id = ?1 RETURNING *",
    )
    .bind(id)
    .bind(time.format("%H:%M:%S").to_string())
    .bind(hours)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<LogRecord>, sqlx::Error> {
    sqlx::query_as::<_, LogRecord>(
        "SELECT * FROM logs WHERE user_id = ?1 ORDER BY date DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// All logs dated `date`, joined to their owners. Logs whose user no longer
/// exists are dropped by the inner join.
pub async fn export_rows_for_date(
    pool: &SqlitePool,
    date: NaiveDate,
) -> Result<Vec<ExportRow>, sqlx::Error> {
    sqlx::query_as::<_, ExportRow>(&format!(
        "SELECT {EXPORT_COLUMNS}
         FROM logs
         JOIN users ON users.id = logs.user_id
         WHERE logs.date = ?1
         ORDER BY logs.id"
    ))
    .bind(date.format("%Y-%m-%d").to_string())
    .fetch_all(pool)
    .await
}

pub async fn export_rows_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ExportRow>, sqlx::Error> {
    sqlx::query_as::<_, ExportRow>(&format!(
        "SELECT {EXPORT_COLUMNS}
         FROM logs
         JOIN users ON users.id = logs.user_id
         WHERE logs.user_id = ?1
         ORDER BY logs.date, logs.id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn export_rows_for_user_on(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Vec<ExportRow>, sqlx::Error> {
    sqlx::query_as::<_, ExportRow>(&format!(
        "SELECT {EXPORT_COLUMNS}
         FROM logs
         JOIN users ON users.id = logs.user_id
         WHERE logs.user_id = ?1 AND logs.date = ?2
         ORDER BY logs.id"
    ))
    .bind(user_id)
    .bind(date.format("%Y-%m-%d").to_string())
    .fetch_all(pool)
    .await
}

/// Hours from `time_in` to `time_out`, rounded to two decimals and never
/// negative. Both ends carry their date, so shifts past midnight count fully.
pub fn hours_between(time_in: NaiveDateTime, time_out: NaiveDateTime) -> f64 {
    let seconds = (time_out - time_in).num_seconds().max(0);
    (seconds as f64 / 3600.0 * 100.0).round() / 100.0
}

/// Parses a stored punch time, accepting `HH:MM:SS` and `HH:MM`.
pub fn parse_punch_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// When a log's shift started: its date at its time-in.
pub fn punched_in_at(log: &LogRecord) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(&log.date, "%Y-%m-%d").ok()?;
    let time = parse_punch_time(log.time_in.as_deref()?)?;
    Some(date.and_time(time))
}
