use sea_orm::DatabaseConnection;

use super::{CouponDao, DaoBase, EventDao, FeedbackDao, RegistrationDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn event(&self) -> EventDao {
        DaoBase::new(&self.db)
    }

    pub fn registration(&self) -> RegistrationDao {
        DaoBase::new(&self.db)
    }

    pub fn feedback(&self) -> FeedbackDao {
        DaoBase::new(&self.db)
    }

    pub fn coupon(&self) -> CouponDao {
        DaoBase::new(&self.db)
    }
}
