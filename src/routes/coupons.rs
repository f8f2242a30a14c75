use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::coupon,
    middleware::CurrentUser,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    code: String,
    discount: i32,
    valid_until: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub id: Uuid,
    pub code: String,
    pub discount: i32,
    pub valid_until: NaiveDate,
    pub created_by_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
}

impl From<coupon::Model> for CouponResponse {
    fn from(model: coupon::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            discount: model.discount,
            valid_until: model.valid_until,
            created_by_id: model.created_by_id,
            created_at: model.created_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/events/coupons", post(create_coupon))
        .with_state(state)
}

async fn create_coupon(
    State(state): State<Arc<AppState>>,
    requester: CurrentUser,
    Json(body): Json<CreateCouponRequest>,
) -> ApiResult<CouponResponse> {
    let coupon = state
        .services
        .coupons
        .create_coupon(
            &requester.id,
            &requester.role,
            &body.code,
            body.discount,
            body.valid_until,
        )
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Coupon created", coupon.into())
}
