#[allow(unused_imports)]
pub mod prelude {
    pub use super::coupon::Entity as Coupon;
    pub use super::event::Entity as Event;
    pub use super::feedback::Entity as Feedback;
    pub use super::registration::Entity as Registration;
    pub use super::user::Entity as User;
}

pub mod coupon;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod user;
