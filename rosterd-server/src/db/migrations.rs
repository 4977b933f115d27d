//! Database migrations for the users table

use sqlx::PgPool;

/// Run all migrations.
///
/// Email carries no UNIQUE constraint: the insert path has no conflict
/// handling, and a violation from an externally managed schema surfaces
/// through the generic database error path.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
