use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::user,
    middleware::CurrentUser,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Public view of an account. The password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/users/{user_id}", delete(delete_account))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<UserResponse> {
    let user = state
        .services
        .auth
        .register(&body.email, &body.password, &body.role)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "User registered", user.into())
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let bundle = state.services.auth.login(&body.email, &body.password).await?;
    JsonApiResponse::ok(TokenResponse {
        access_token: bundle.access_token,
        token_type: bundle.token_type,
        expires_in: bundle.expires_in,
    })
}

/// Tokens are stateless, so there is nothing to revoke server-side; an issued
/// token stays valid until its expiry. The client discards its copy.
async fn logout() -> ApiResult<serde_json::Value> {
    JsonApiResponse::with_status(StatusCode::OK, "Logged out", serde_json::Value::Null)
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state
        .services
        .auth
        .delete_account(&requester.id, &requester.role, &user_id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Account deleted", serde_json::Value::Null)
}
