//! User repository
//!
//! Reads are bounded and deterministically ordered; writes are single
//! atomic INSERT ... RETURNING statements, so a row is either fully
//! persisted or not persisted at all.

use sqlx::PgPool;

use crate::models::{NewUser, User};

/// Hard cap on list reads.
const LIST_LIMIT: i64 = 100;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List users in ascending id order, capped at 100 rows.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email FROM users ORDER BY id LIMIT $1",
        )
        .bind(LIST_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Insert a user and return the stored record with its assigned id.
    pub async fn create(&self, user: NewUser) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(user.name())
        .bind(user.email())
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterd_core::PoolConfig;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url, &PoolConfig::default())
            .await
            .expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_returns_assigned_id_and_verbatim_fields() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let created = repo
            .create(NewUser::new("Ana", "ana@x.com").unwrap())
            .await
            .expect("insert failed");

        assert!(created.id > 0);
        assert_eq!(created.name, "Ana");
        assert_eq!(created.email, "ana@x.com");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_is_bounded_and_ascending() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let users = repo.list().await.expect("list failed");
        assert!(users.len() <= 100);
        assert!(users.windows(2).all(|w| w[0].id <= w[1].id));
    }
}
