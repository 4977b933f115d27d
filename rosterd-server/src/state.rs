//! Application state shared across handlers
//!
//! The pool lifecycle is an explicit tagged state rather than a nullable
//! global: the server starts `Initializing`, flips to `Ready` once startup
//! init finishes, and handlers answer 503 until then. Degraded
//! connectivity after that point is handled per-request, never tracked
//! here.

use sqlx::PgPool;
use tokio::sync::RwLock;

/// Pool lifecycle state.
pub enum DatabaseState {
    /// Startup init (credential resolution, pool construction, migrations)
    /// has not completed yet.
    Initializing,
    /// The pool is constructed and migrations have run.
    Ready(PgPool),
}

/// Shared application state.
pub struct AppState {
    db: RwLock<DatabaseState>,
}

impl AppState {
    /// State for a server whose pool is still being constructed.
    pub fn uninitialized() -> Self {
        Self {
            db: RwLock::new(DatabaseState::Initializing),
        }
    }

    /// State with a ready pool, used once init completes and by tests.
    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            db: RwLock::new(DatabaseState::Ready(pool)),
        }
    }

    /// Clone out the pool if it is ready. Pool clones share the same
    /// underlying connection set, so this is cheap.
    pub async fn pool(&self) -> Option<PgPool> {
        match &*self.db.read().await {
            DatabaseState::Ready(pool) => Some(pool.clone()),
            DatabaseState::Initializing => None,
        }
    }

    /// Flip the state to ready. Called exactly once by startup init.
    pub async fn set_ready(&self, pool: PgPool) {
        *self.db.write().await = DatabaseState::Ready(pool);
    }
}
