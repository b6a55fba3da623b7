use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::schedule::ScheduleStore;
use crate::server::api;

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScheduleStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<ScheduleStore>, config: Config) -> Self {
        AppState {
            store,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let frontend = ServeDir::new(&state.config.frontend_dir);
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/stats", get(api::stats))
        .route("/api/groups", get(api::groups))
        .route("/api/groups/:group/days/:day", get(api::group_day))
        .route("/api/groups/:group/days/:day/text", get(api::group_day_text))
        .route("/api/teachers", get(api::teachers))
        .route("/api/teachers/:teacher", get(api::teacher_rows))
        .route("/api/teachers/:teacher/lessons", get(api::teacher_lessons))
        .route("/api/teachers/:teacher/text", get(api::teacher_text))
        .route("/api/schedule/upload", post(api::upload_schedule))
        .route("/api/schedule/reload", post(api::reload_schedule))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .fallback_service(frontend)
        .with_state(state)
}
