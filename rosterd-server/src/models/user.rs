//! User record and validated creation input

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// A stored user record. The id is assigned by the database and never
/// changes once issued.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Validated input for user creation.
///
/// Construction is the only validation gate: both fields must be
/// non-empty. No email format or uniqueness checks are applied.
#[derive(Debug, Clone)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let email = email.into();
        if name.is_empty() || email.is_empty() {
            return Err(ValidationError::MissingUserFields);
        }
        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
