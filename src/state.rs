use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::email::Mailer;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// `None` when mail is not configured; notifications are then skipped.
    pub mailer: Option<Arc<dyn Mailer>>,
}
