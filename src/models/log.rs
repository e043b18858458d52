use serde::{Deserialize, Serialize};

/// One attendance record for a user on a calendar date.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    pub user_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time_in: Option<String>,
    pub time_out: Option<String>,
    pub hours: Option<f64>,
}

/// A log joined to its owning user, flattened for CSV export.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct ExportRow {
    pub employee_id: String,
    pub name: String,
    pub role: String,
    pub date: String,
    pub time_in: Option<String>,
    pub time_out: Option<String>,
    pub hours: Option<f64>,
}
