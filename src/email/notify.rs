use crate::models::{LeaveRequest, LeaveStatus, User};
use crate::state::AppState;

use super::{templates, OutgoingEmail};

/// Tell the administrator about a new leave request. Failures are logged.
pub async fn leave_requested(state: &AppState, user: &User, leave: &LeaveRequest) {
    let (Some(mailer), Some(mail)) = (&state.mailer, &state.config.mail) else {
        tracing::debug!("Mail not configured, skipping leave request notification");
        return;
    };

    let email = OutgoingEmail {
        from: mail.sender(),
        to: mail.admin_email.clone(),
        subject: templates::leave_request_subject(&user.name),
        text: templates::render_leave_request(&user.name, user.email.as_deref(), leave),
        attachments: vec![],
    };

    if let Err(e) = mailer.send(email).await {
        tracing::error!("Failed to notify admin of leave request {}: {e}", leave.id);
    }
}

/// Tell the employee their request was decided. Failures are logged.
pub async fn leave_decided(state: &AppState, user: &User, leave: &LeaveRequest, status: LeaveStatus) {
    let (Some(mailer), Some(mail)) = (&state.mailer, &state.config.mail) else {
        tracing::debug!("Mail not configured, skipping leave decision notification");
        return;
    };
    let Some(to) = user.email.clone() else {
        tracing::debug!("User {} has no email, skipping leave decision notification", user.id);
        return;
    };

    let email = OutgoingEmail {
        from: mail.sender(),
        to,
        subject: templates::leave_decision_subject(status),
        text: templates::render_leave_decision(&user.name, status),
        attachments: vec![],
    };

    if let Err(e) = mailer.send(email).await {
        tracing::error!("Failed to notify user {} of leave request {}: {e}", user.id, leave.id);
    }
}
