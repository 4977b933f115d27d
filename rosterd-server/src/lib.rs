//! rosterd-server: HTTP API over the users table
//!
//! Exposes the health probe and the users list/create endpoints, backed by
//! a bounded sqlx Postgres pool whose credentials come from
//! `rosterd-core`'s tiered secrets resolver.

pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use http::server::{build_router, run_server, ServerError};
pub use state::{AppState, DatabaseState};
