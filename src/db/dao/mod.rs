pub mod base;
pub mod base_traits;
mod context;
pub mod coupon_dao;
pub mod error;
pub mod event_dao;
pub mod feedback_dao;
pub mod registration_dao;
pub mod user_dao;

pub use base::{DaoBase, DaoPager, PaginatedResponse};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use coupon_dao::CouponDao;
pub use error::{DaoLayerError, DaoResult};
pub use event_dao::{EventDao, EventFilters};
pub use feedback_dao::FeedbackDao;
pub use registration_dao::RegistrationDao;
pub use user_dao::UserDao;
