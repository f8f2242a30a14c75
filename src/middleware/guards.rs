use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header};
use uuid::Uuid;

use crate::{
    auth::{
        Role,
        jwt::{TOKEN_REJECTED_MESSAGE, decode_token},
    },
    error::AppError,
    state::AppState,
};

/// The authenticated requester, resolved from the bearer token on first use
/// and cached in request extensions for the rest of the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(user);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = auth
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?;

        let claims = decode_token(&state.jwt, token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(TOKEN_REJECTED_MESSAGE))?;

        // A valid token whose subject was deleted in the meantime is a 404,
        // not a 401.
        let user = state
            .services
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User for this token no longer exists"))?;

        // A role value outside the known set means the row was tampered with
        // or written by incompatible code; refuse rather than guess a role.
        let role = Role::try_from(user.role.as_str()).map_err(|_| {
            tracing::error!(user_id = %user.id, role = %user.role, "unrecognized role on user row");
            AppError::internal("Something went wrong")
        })?;
        let current = CurrentUser {
            id: user.id,
            email: user.email,
            role,
        };

        parts.extensions.insert(current.clone());
        Ok(current)
    }
}
