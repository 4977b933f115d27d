//! Repository implementations for database access
//!
//! Each repository borrows the pool and performs exactly one statement per
//! connection checkout; the connection is released on drop, success or
//! failure.

pub mod users;

pub use users::{DbError, UserRepo};
