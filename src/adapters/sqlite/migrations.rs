//! SQLite database migration management.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

/// Failures while bringing the schema up to date.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A migration script failed and its transaction was rolled back.
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        /// Version of the failing migration.
        version: i64,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },
    /// `schema_migrations` could not be read.
    #[error("Failed to get schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

/// One embedded schema change.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Monotonic schema version.
    pub version: i64,
    /// Short label recorded in `schema_migrations`.
    pub description: String,
    /// SQL script, possibly several statements.
    pub sql: String,
}

/// Applies pending migrations to a pool.
pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    /// Migrator for `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every migration newer than the recorded schema version.
    ///
    /// Returns the number of migrations applied.
    pub async fn run_embedded_migrations(&self, migrations: Vec<Migration>) -> Result<usize, MigrationError> {
        self.ensure_migrations_table().await?;
        let current_version = self.get_current_version().await?;
        let pending: Vec<_> = migrations.into_iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            return Ok(0);
        }

        for migration in &pending {
            self.apply_migration(migration).await?;
            info!(version = migration.version, description = %migration.description, "applied migration");
        }

        Ok(pending.len())
    }

    async fn ensure_migrations_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )"
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MigrationError::ExecutionError { version: 0, source: e })?;
        Ok(())
    }

    /// Highest applied version, 0 for a fresh database.
    pub async fn get_current_version(&self) -> Result<i64, MigrationError> {
        let result: Option<(i64,)> = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_optional(&self.pool)
            .await
            .map_err(MigrationError::VersionCheckError)?;
        Ok(result.map_or(0, |(v,)| v))
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), MigrationError> {
        let to_error = |e: sqlx::Error| MigrationError::ExecutionError { version: migration.version, source: e };

        let mut tx = self.pool.begin().await.map_err(to_error)?;
        sqlx::raw_sql(&migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(to_error)?;
        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(to_error)?;
        tx.commit().await.map_err(to_error)?;
        Ok(())
    }
}

/// Version 1: the `users` table.
pub fn create_users_migration() -> Migration {
    Migration {
        version: 1,
        description: "Create users table".to_string(),
        sql: include_str!("../../../migrations/001_create_users.sql").to_string(),
    }
}

/// Every migration shipped with the binary, in version order.
pub fn all_embedded_migrations() -> Vec<Migration> {
    vec![create_users_migration()]
}
