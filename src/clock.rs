use chrono::{Local, NaiveDate, NaiveDateTime};

/// Wall-clock time of the host. Punches and the default backup date both
/// come from here so they partition logs by the same calendar day.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    local_now().date()
}
