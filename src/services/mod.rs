pub mod auth_service;
mod context;
pub mod coupon_service;
pub mod event_service;
pub mod password_service;
pub mod registration_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use context::ServiceContext;
pub use coupon_service::CouponService;
pub use event_service::{EVENTS_PAGE_SIZE, EventPatch, EventService, NewEvent};
pub use password_service::PasswordResetService;
pub use registration_service::{FeedbackOutcome, RegistrationService};
pub use user_service::UserService;
