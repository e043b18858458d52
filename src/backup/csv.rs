use std::fmt::Write;

use crate::models::ExportRow;

pub const HEADER: [&str; 7] = [
    "Employee ID",
    "Name",
    "Role",
    "Date",
    "Time In",
    "Time Out",
    "Hours",
];

/// Renders rows under the fixed header, one line per row. Absent punches and
/// hours become empty fields.
pub fn render(rows: &[ExportRow]) -> String {
    let mut csv = String::new();

    let _ = writeln!(csv, "{}", HEADER.join(","));

    for row in rows {
        let hours = row.hours.map(|h| h.to_string()).unwrap_or_default();
        let fields = [
            row.employee_id.as_str(),
            row.name.as_str(),
            row.role.as_str(),
            row.date.as_str(),
            row.time_in.as_deref().unwrap_or_default(),
            row.time_out.as_deref().unwrap_or_default(),
            hours.as_str(),
        ];
        let line = fields
            .iter()
            .map(|f| escape(f))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(csv, "{line}");
    }

    csv
}

fn escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
