pub mod jwt;
pub mod password;
pub mod policy;
mod types;

pub use types::{Claims, Role, TokenBundle};
