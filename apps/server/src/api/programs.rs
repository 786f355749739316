use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use ysws_notifier_core::programs::ProgramRecord;

use crate::{error::ApiResult, main_lib::AppState};

/// The catalog as of the last completed detection cycle.
async fn get_programs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ProgramRecord>>> {
    let programs = state.subscription_store.load_snapshot().await?;
    Ok(Json(programs))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/programs", get(get_programs))
}
