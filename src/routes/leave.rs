use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::parse_date;
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::email::notify;
use crate::error::AppError;
use crate::models::{LeaveRequest, LeaveStatus};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateLeave {
    pub reason: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Deserialize)]
pub struct Decision {
    pub status: LeaveStatus,
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateLeave>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let reason = req
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest("reason is required".to_string()))?;

    let from_raw = req
        .from_date
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("from_date is required".to_string()))?;
    let from_date = parse_date("from_date", from_raw)?;

    if let Some(to_raw) = req.to_date.as_deref() {
        if parse_date("to_date", to_raw)? < from_date {
            return Err(AppError::BadRequest(
                "to_date must not be before from_date".to_string(),
            ));
        }
    }

    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let leave = db::leave_requests::create(
        &state.pool,
        user.id,
        reason,
        from_raw,
        req.to_date.as_deref(),
    )
    .await?;

    notify::leave_requested(&state, &user, &leave).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Leave request submitted", "leave": leave })),
    ))
}

pub async fn list_mine(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    let requests = db::leave_requests::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(requests))
}

pub async fn list_all(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    auth.require_admin()?;
    let requests = db::leave_requests::list_all(&state.pool).await?;
    Ok(Json(requests))
}

pub async fn decide(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<Decision>,
) -> Result<Json<LeaveRequest>, AppError> {
    auth.require_admin()?;

    if req.status == LeaveStatus::Pending {
        return Err(AppError::BadRequest(
            "status must be approved or rejected".to_string(),
        ));
    }

    let leave = match db::leave_requests::decide(&state.pool, id, req.status).await? {
        Some(leave) => leave,
        None => {
            return Err(match db::leave_requests::find_by_id(&state.pool, id).await? {
                Some(_) => AppError::Conflict("Leave request already decided".to_string()),
                None => AppError::NotFound("Leave request not found".to_string()),
            });
        }
    };

    tracing::info!("Leave request {id} {}", req.status);

    if let Some(user) = db::users::find_by_id(&state.pool, leave.user_id).await? {
        notify::leave_decided(&state, &user, &leave, req.status).await;
    }

    Ok(Json(leave))
}
