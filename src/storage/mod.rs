//! User storage collaborator consumed by the authentication core.
//!
//! The core only ever talks to [`UserStore`]; it never sees a connection pool.
//! Implementations own their own transaction and isolation guarantees; in
//! particular `insert_user` is the uniqueness check for email addresses.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User, UserId};

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// An infrastructure fault in the storage layer (connection loss, pool timeout...).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure of [`UserStore::insert_user`].
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Persists the credential and profile in one step and returns the new id.
    /// Fails with [`InsertError::DuplicateEmail`] if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<UserId, InsertError>;
}
