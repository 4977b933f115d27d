//! Domain models and validation

pub mod user;
pub mod validation;

pub use user::{NewUser, User};
pub use validation::ValidationError;
