//! SQLite implementation of the user `EntityStore`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{parse_datetime, parse_entity_id};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EntityId, User};
use crate::domain::ports::EntityStore;

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

/// `EntityStore` over the `users` table.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Repository over an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored users.
    pub async fn count(&self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(count).map_err(|e| DomainError::SerializationError(e.to_string()))
    }

    /// Close the underlying pool. Later calls fail with `StoreUnavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl EntityStore for SqliteUserRepository {
    type Entity = User;

    #[instrument(skip(self))]
    async fn get_by_key(&self, key: EntityId) -> DomainResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(key.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    #[instrument(skip(self, user), fields(key = ?user.id))]
    async fn upsert(&self, user: User) -> DomainResult<User> {
        let now = Utc::now().to_rfc3339();

        // created_at is only written on insert; conflicts keep the original.
        let row: UserRow = match user.id {
            Some(id) => {
                sqlx::query_as(&format!(
                    r#"INSERT INTO users (id, name, email, created_at, updated_at)
                       VALUES (?, ?, ?, ?, ?)
                       ON CONFLICT(id) DO UPDATE SET
                           name = excluded.name,
                           email = excluded.email,
                           updated_at = excluded.updated_at
                       RETURNING {USER_COLUMNS}"#
                ))
                .bind(id.get())
                .bind(&user.name)
                .bind(&user.email)
                .bind(&now)
                .bind(&now)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    r#"INSERT INTO users (name, email, created_at, updated_at)
                       VALUES (?, ?, ?, ?)
                       RETURNING {USER_COLUMNS}"#
                ))
                .bind(&user.name)
                .bind(&user.email)
                .bind(&now)
                .bind(&now)
                .fetch_one(&self.pool)
                .await?
            }
        };

        debug!(id = row.id, "user upserted");
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn delete_by_key(&self, key: EntityId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(key.get())
            .execute(&self.pool)
            .await?;

        debug!(rows = result.rows_affected(), "user delete executed");
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: Some(parse_entity_id(row.id)?),
            name: row.name,
            email: row.email,
            created_at: Some(parse_datetime(&row.created_at)?),
            updated_at: Some(parse_datetime(&row.updated_at)?),
        })
    }
}
