pub mod auth;
pub mod backup;
pub mod clock;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::Mailer;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: SqlitePool, config: Config, mailer: Option<Arc<dyn Mailer>>) -> Router {
    if mailer.is_none() {
        tracing::warn!("Mail not configured, notifications and backups are disabled");
    }

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        mailer,
    });

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
