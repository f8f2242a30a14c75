use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::jwt::JwtKeys, db::dao::DaoContext, mail::Mailer};

use super::{
    auth_service::AuthService, coupon_service::CouponService, event_service::EventService,
    password_service::PasswordResetService, registration_service::RegistrationService,
    user_service::UserService,
};

/// One instance per process; handlers reach services through this.
#[derive(Clone)]
pub struct ServiceContext {
    pub users: UserService,
    pub auth: AuthService,
    pub password_reset: PasswordResetService,
    pub events: EventService,
    pub registrations: RegistrationService,
    pub coupons: CouponService,
}

impl ServiceContext {
    pub fn new(
        db: &DatabaseConnection,
        jwt: JwtKeys,
        mailer: Arc<dyn Mailer>,
        reset_base_url: String,
    ) -> Self {
        let daos = DaoContext::new(db);
        let users = UserService::new(daos.user());

        Self {
            auth: AuthService::new(users.clone(), jwt),
            password_reset: PasswordResetService::new(users.clone(), mailer, reset_base_url),
            events: EventService::new(daos.event()),
            registrations: RegistrationService::new(
                daos.registration(),
                daos.event(),
                daos.feedback(),
            ),
            coupons: CouponService::new(daos.coupon()),
            users,
        }
    }
}
