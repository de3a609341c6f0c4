use async_trait::async_trait;
use sqlx::PgPool;

use super::{InsertError, StorageError, UserStore};
use crate::models::{NewUser, User, UserId};

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, is_active, created_at, updated_at";

/// PostgreSQL-backed user store.
///
/// Expects a `users` table as created by [`PgUserStore::init_schema`]. The
/// unique index on `email` is what makes registration atomic.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `users` table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                first_name TEXT,
                last_name TEXT,
                password_hash TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserId, InsertError> {
        let result = sqlx::query_as::<_, (UserId,)>(
            "INSERT INTO users (id, email, first_name, last_name, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(UserId::new())
        .bind(&user.email)
        .bind(&user.profile.first_name)
        .bind(&user.profile.last_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok((id,)) => Ok(id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(InsertError::DuplicateEmail)
            }
            Err(e) => Err(InsertError::Storage(e.into())),
        }
    }
}
