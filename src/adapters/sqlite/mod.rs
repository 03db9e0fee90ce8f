//! SQLite database adapters for the user cache service.

pub mod connection;
pub mod migrations;
pub mod user_repository;

pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use user_repository::SqliteUserRepository;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DatabaseConfig, EntityId};

/// Parse a stored integer key. Stored keys that fail validation mean the
/// row is corrupt, not that the caller supplied a bad key.
pub fn parse_entity_id(raw: i64) -> DomainResult<EntityId> {
    EntityId::new(raw).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Failures from [`initialize_database`].
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Opening the pool failed.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// Applying migrations failed.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Open the configured database and bring its schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(&config.url(), Some(PoolConfig::from(config))).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_id_rejects_corrupt_rows() {
        assert_eq!(parse_entity_id(3).unwrap().get(), 3);
        assert!(matches!(parse_entity_id(0), Err(DomainError::SerializationError(_))));
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T08:00:00+00:00");
        assert!(parse_datetime("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_initialize_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("users.db").display().to_string(),
            ..DatabaseConfig::default()
        };

        let pool = initialize_database(&config).await.unwrap();
        verify_connection(&pool).await.unwrap();

        // Re-opening an initialized database is a no-op migration run.
        let pool = initialize_database(&config).await.unwrap();
        let version = Migrator::new(pool).get_current_version().await.unwrap();
        assert_eq!(version, 1);
    }
}
