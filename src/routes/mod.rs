pub mod backups;
pub mod leave;
pub mod logs;

use axum::routing::{get, post, put};
use axum::Router;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Logs
        .route("/api/v1/logs", get(logs::list))
        .route("/api/v1/logs/time-in", post(logs::time_in))
        .route("/api/v1/logs/time-out", post(logs::time_out))
        .route("/api/v1/logs/export", get(logs::export))
        // Leave
        .route("/api/v1/leave", get(leave::list_all).post(leave::create))
        .route("/api/v1/leave/mine", get(leave::list_mine))
        .route("/api/v1/leave/{id}", put(leave::decide))
        // Backups
        .route("/api/v1/backups", post(backups::run))
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("{field} must be a YYYY-MM-DD date")))
}
