use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::parse_date;
use crate::auth::extractor::AuthUser;
use crate::backup::{self, BackupRequest, BackupSummary};
use crate::clock;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct BackupParams {
    pub date: Option<String>,
}

pub async fn run(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<BackupParams>,
) -> Result<Json<BackupSummary>, AppError> {
    auth.require_admin()?;

    let (Some(mailer), Some(mail)) = (&state.mailer, &state.config.mail) else {
        return Err(AppError::ServiceUnavailable(
            "Mail is not configured".to_string(),
        ));
    };

    let date = match params.date.as_deref() {
        Some(raw) => parse_date("date", raw)?,
        None => clock::today(),
    };

    let request = BackupRequest::new(date, mail, &state.config.backup_dir);
    let summary = backup::run_daily_backup(&request, &state.pool, mailer.as_ref()).await?;

    tracing::info!("On-demand backup by user {}: {summary}", auth.user_id);

    Ok(Json(summary))
}
