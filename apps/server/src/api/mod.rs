use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

pub mod programs;
pub mod subscribe;

async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new().merge(programs::router());

    Router::new()
        .merge(subscribe::router())
        .route("/healthz", get(healthz))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
