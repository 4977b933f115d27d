//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is the only
//! shared mutable resource in the system; it bounds simultaneous physical
//! connections and queues checkouts beyond the ceiling. The acquire
//! timeout is the only timeout propagated into waiting requests.

use std::time::Duration;

use rosterd_core::PoolConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create a PostgreSQL connection pool.
///
/// Connectivity is validated up front: this fails if the database is
/// unreachable, and the caller decides whether to retry or keep answering
/// 503.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}
