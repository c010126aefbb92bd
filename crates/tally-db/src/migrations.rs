//! # Schema Migrations
//!
//! Embedded SQL migrations, applied at startup.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  migrations/sqlite/*.sql  ──(compile time)──▶  embedded in binary       │
//! │                                                                         │
//! │  run_migrations(pool)                                                   │
//! │    1. Create _sqlx_migrations table if missing                          │
//! │    2. Compare applied versions against embedded set                     │
//! │    3. Apply pending migrations in order, each in a transaction          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Migration files are named `NNN_description.sql` and are append-only:
//! never edit an applied migration, add a new one.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Migrations embedded from `migrations/sqlite/` at the workspace root.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Running database migrations");
    MIGRATOR.run(pool).await?;
    info!("Migrations complete");
    Ok(())
}

/// Returns the embedded migration versions, for diagnostics.
pub fn migration_versions() -> Vec<i64> {
    MIGRATOR.iter().map(|m| m.version).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_embedded() {
        let versions = migration_versions();
        assert!(!versions.is_empty());
        assert_eq!(versions[0], 1);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        // Second run applies nothing and must not fail.
        run_migrations(&pool).await.unwrap();
    }
}
