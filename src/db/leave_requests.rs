use sqlx::SqlitePool;

use crate::models::{LeaveRequest, LeaveStatus};

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    reason: &str,
    from_date: &str,
    to_date: Option<&str>,
) -> Result<LeaveRequest, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(
        "INSERT INTO leave_requests (user_id, reason, from_date, to_date)
         VALUES (?1, ?2, ?3, ?4) RETURNING *",
    )
    .bind(user_id)
    .bind(reason)
    .bind(from_date)
    .bind(to_date)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests ORDER BY id DESC")
        .fetch_all(pool)
        .await
}

pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(
        "SELECT * FROM leave_requests WHERE user_id = ?1 ORDER BY id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Moves a pending request to `status`. Returns `None` when the request does
/// not exist or has already been decided.
pub async fn decide(
    pool: &SqlitePool,
    id: i64,
    status: LeaveStatus,
) -> Result<Option<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(
        "UPDATE leave_requests SET status = ?2
         WHERE id = ?1 AND status = 'pending' RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}
