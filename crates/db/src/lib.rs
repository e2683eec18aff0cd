//! PostgreSQL layer for Mural: pool construction, migrations, row models,
//! repositories, and the concurrency-controlled services (ledger, placement,
//! generation lifecycle).
//!
//! The database is the sole owner of all four record families; no in-process
//! cache is authoritative. All cross-request coordination happens through
//! single-statement conditional updates — see [`services`].

pub mod models;
pub mod repositories;
pub mod services;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used at startup and by the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Whether `err` is a PostgreSQL unique-constraint violation (23505) on the
/// named constraint. Used by the placement service to distinguish the
/// expected slot-creation race from genuine integrity failures.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
