use chrono::NaiveDate;
use sea_orm::SqlErr;
use uuid::Uuid;

use crate::{
    auth::{
        Role,
        policy::{self, Action},
    },
    db::dao::{CouponDao, DaoLayerError},
    db::entities::coupon,
    error::AppError,
};

#[derive(Clone)]
pub struct CouponService {
    coupons: CouponDao,
}

impl CouponService {
    pub fn new(coupons: CouponDao) -> Self {
        Self { coupons }
    }

    pub async fn create_coupon(
        &self,
        requester_id: &Uuid,
        requester_role: &Role,
        code: &str,
        discount: i32,
        valid_until: NaiveDate,
    ) -> Result<coupon::Model, AppError> {
        policy::require_role(Action::CreateCoupon, requester_role)?;

        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::bad_request("Coupon code is required"));
        }
        if !(0..=100).contains(&discount) {
            return Err(AppError::bad_request("Discount must be between 0 and 100"));
        }

        match self
            .coupons
            .create_coupon(code, discount, valid_until, requester_id)
            .await
        {
            Ok(model) => Ok(model),
            Err(DaoLayerError::Db(db_err))
                if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                Err(AppError::duplicate("Coupon code already exists"))
            }
            Err(err) => Err(err.into()),
        }
    }
}
