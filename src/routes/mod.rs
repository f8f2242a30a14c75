use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod coupons;
pub mod events;
pub mod password;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(auth::router(state.clone()))
        .merge(password::router(state.clone()))
        .merge(events::router(state.clone()))
        .merge(coupons::router(state))
}
