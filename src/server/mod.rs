use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::schedule::ScheduleStore;

pub mod api;
pub mod routes;

pub use routes::{build_router, AppState};

/// Serve the API on `config.bind_addr` until the process is stopped.
pub fn run_server(config: Config, store: Arc<ScheduleStore>) -> std::io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
        info!("timetable server listening on http://{}", config.bind_addr);
        let app = build_router(AppState::new(store, config));
        axum::serve(listener, app).await
    })
}
