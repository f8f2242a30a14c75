use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::coupon;

#[derive(Clone)]
pub struct CouponDao {
    db: DatabaseConnection,
}

impl DaoBase for CouponDao {
    type Entity = coupon::Entity;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CouponDao {
    pub async fn create_coupon(
        &self,
        code: &str,
        discount: i32,
        valid_until: NaiveDate,
        created_by_id: &Uuid,
    ) -> DaoResult<coupon::Model> {
        let model = coupon::ActiveModel {
            code: Set(code.to_string()),
            discount: Set(discount),
            valid_until: Set(valid_until),
            created_by_id: Set(*created_by_id),
            ..Default::default()
        };
        self.create(model).await
    }
}
