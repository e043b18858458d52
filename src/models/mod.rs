mod leave_request;
mod log;
mod user;

pub use leave_request::{LeaveRequest, LeaveStatus};
pub use log::{ExportRow, LogRecord};
pub use user::User;
