pub mod leave_requests;
pub mod logs;
pub mod users;
