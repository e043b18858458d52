use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Days;
use serde::Deserialize;

use super::parse_date;
use crate::auth::extractor::AuthUser;
use crate::backup::csv;
use crate::clock;
use crate::db;
use crate::error::AppError;
use crate::models::{LogRecord, User};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ExportParams {
    pub date: Option<String>,
}

async fn current_user(state: &SharedState, auth: &AuthUser) -> Result<User, AppError> {
    db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn time_in(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = current_user(&state, &auth).await?;
    let now = clock::local_now();

    let log = db::logs::record_time_in(&state.pool, user.id, now.date(), now.time())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Already timed in today".to_string())
            }
            other => AppError::Database(other),
        })?;

    tracing::info!("User {} timed in for {}", user.employee_id, log.date);

    Ok(Json(serde_json::json!({ "message": "Time in recorded", "log": log })))
}

pub async fn time_out(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = current_user(&state, &auth).await?;
    let now = clock::local_now();
    let today = now.date();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

    // A shift may have started yesterday and run past midnight
    let log = match db::logs::find_open_since(&state.pool, user.id, yesterday).await? {
        Some(log) => log,
        None => {
            return Err(
                match db::logs::find_by_user_and_date(&state.pool, user.id, today).await? {
                    Some(_) => AppError::Conflict("Already timed out today".to_string()),
                    None => AppError::NotFound("No time in recorded today".to_string()),
                },
            );
        }
    };

    let punched_in = db::logs::punched_in_at(&log)
        .ok_or_else(|| AppError::BadRequest("Open log has no valid time in".to_string()))?;

    let hours = db::logs::hours_between(punched_in, now);
    let log = db::logs::record_time_out(&state.pool, log.id, now.time(), hours).await?;

    tracing::info!("User {} timed out for {} ({hours}h)", user.employee_id, log.date);

    Ok(Json(serde_json::json!({ "message": "Time out recorded", "log": log })))
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<LogRecord>>, AppError> {
    let logs = db::logs::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(logs))
}

pub async fn export(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state, &auth).await?;

    let rows = match params.date.as_deref() {
        Some(raw) => {
            let date = parse_date("date", raw)?;
            db::logs::export_rows_for_user_on(&state.pool, user.id, date).await?
        }
        None => db::logs::export_rows_for_user(&state.pool, user.id).await?,
    };

    let disposition = format!("attachment; filename=\"logs_{}.csv\"", user.employee_id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv::render(&rows),
    ))
}
