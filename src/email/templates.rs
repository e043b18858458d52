use crate::models::{LeaveRequest, LeaveStatus};

pub fn backup_subject(date: &str) -> String {
    format!("Daily Logs Backup - {date}")
}

pub fn render_backup_body(date: &str, rows: usize) -> String {
    format!("Attached is the CSV backup of the {rows} attendance log(s) recorded on {date}.")
}

pub fn leave_request_subject(name: &str) -> String {
    format!("Leave Request from {name}")
}

pub fn render_leave_request(name: &str, email: Option<&str>, leave: &LeaveRequest) -> String {
    format!(
        "Leave Request from: {name} ({email})\nFrom: {from}\nTo: {to}\nReason: {reason}\n",
        email = email.unwrap_or("no email on file"),
        from = leave.from_date,
        to = leave.to_date.as_deref().unwrap_or(&leave.from_date),
        reason = leave.reason,
    )
}

pub fn leave_decision_subject(status: LeaveStatus) -> String {
    format!("Your Leave Request was {status}")
}

pub fn render_leave_decision(name: &str, status: LeaveStatus) -> String {
    format!("Hello {name}, your leave request has been {status}.")
}
