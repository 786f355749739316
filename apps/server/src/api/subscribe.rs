//! Browser-facing subscription control endpoint.
//!
//! Called cross-origin from the tracker page, so every response carries the
//! CORS headers, including errors and the 405 fallback.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::set_header::SetResponseHeaderLayer;
use ysws_notifier_core::subscriptions::PushSubscription;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const ALLOWED_ORIGIN: &str = "*";
const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

impl StatusResponse {
    fn success() -> Json<Self> {
        Json(Self { status: "success" })
    }
}

/// Body of an unsubscribe request. Browsers send the whole subscription;
/// only the endpoint is used.
#[derive(Debug, Deserialize)]
struct UnsubscribeRequest {
    endpoint: String,
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PushSubscription>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(subscription) = payload?;
    state.subscription_service.register(subscription).await?;
    Ok(StatusResponse::success())
}

async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UnsubscribeRequest>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(request) = payload?;
    state
        .subscription_service
        .unregister(&request.endpoint)
        .await?;
    Ok(StatusResponse::success())
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/subscribe",
            post(subscribe)
                .delete(unsubscribe)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOWED_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
}
