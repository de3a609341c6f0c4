use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{InsertError, StorageError, UserStore};
use crate::models::{NewUser, User, UserId};

/// Process-local user store, used when no `DATABASE_URL` is configured and in tests.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("user table lock poisoned".into())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserId, InsertError> {
        // Uniqueness check and insert happen under the same write guard.
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if users.values().any(|u| u.email == user.email) {
            return Err(InsertError::DuplicateEmail);
        }

        let now = Utc::now();
        let id = UserId::new();
        users.insert(
            id,
            User {
                id,
                email: user.email,
                first_name: user.profile.first_name,
                last_name: user.profile.last_name,
                password_hash: user.password_hash,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }
}
