//! User domain
//!
//! Registered identities, their validation rules and the storage seam.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_username, UserValidationError};

#[cfg(test)]
pub use repository::MockUserRepository;
