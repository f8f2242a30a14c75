use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde::Deserialize;

use crate::{
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RequestResetRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct ConsumeResetRequest {
    password: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/password/password-reset", post(request_reset))
        .route("/password/reset-password/{reset_token}", post(consume_reset))
        .with_state(state)
}

async fn request_reset(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RequestResetRequest>,
) -> ApiResult<serde_json::Value> {
    state.services.password_reset.request_reset(&body.email).await?;
    JsonApiResponse::with_status(
        axum::http::StatusCode::OK,
        "Reset email sent",
        serde_json::Value::Null,
    )
}

async fn consume_reset(
    State(state): State<Arc<AppState>>,
    Path(reset_token): Path<String>,
    Json(body): Json<ConsumeResetRequest>,
) -> ApiResult<serde_json::Value> {
    state
        .services
        .password_reset
        .consume_reset(&reset_token, &body.password)
        .await?;
    JsonApiResponse::with_status(
        axum::http::StatusCode::OK,
        "Password updated",
        serde_json::Value::Null,
    )
}
